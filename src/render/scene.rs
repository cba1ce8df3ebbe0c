//! Retained-mode scene-graph backend.
//!
//! Every grid cell owns one persistent square [`Primitive`] in the z = 0
//! plane, created once at initialization. Drawing a frame only changes which
//! primitives belong to the visible [`Group`], then renders the scene through
//! a [`PerspectiveCamera`] looking straight down the -z axis.
//!
//! World space has +y pointing up, so row 0 sits at the bottom of the
//! rendered image. Pointer rows are flipped to match.

use glam::{Mat4, Vec2, Vec3};

use crate::engine::{Cell, CellCoordinates, Engine};
use crate::schema::{Color, Palette};

use super::{
    ChangeSet, DrawSummary, GridView, PointerInput, RasterSurface, RenderBackend, RenderError,
    RowAxis, cell_at, cell_size_for, ensure_dimensions,
};

/// Default far plane, extended when the camera has to sit further away.
const MIN_FAR_PLANE: f32 = 1000.0;
const NEAR_PLANE: f32 = 0.1;

/// Perspective camera with a fixed -z view direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    /// Camera centered over a `extent`-sized rectangle at the origin, far
    /// enough back that the whole rectangle is in view.
    pub fn framing(extent: Vec2, fov_degrees: f32, aspect: f32) -> Self {
        let center = extent / 2.0;
        let half_fov = (fov_degrees / 2.0).to_radians();
        let distance = (center.x.max(center.y) / half_fov.tan()).ceil();
        Self {
            position: center.extend(distance),
            fov_degrees,
            aspect,
            near: NEAR_PLANE,
            far: MIN_FAR_PLANE.max(distance * 2.0),
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        let projection =
            Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far);
        let view = Mat4::look_at_rh(self.position, self.position - Vec3::Z, Vec3::Y);
        projection * view
    }

    /// Project a world point to viewport pixels (origin top-left, y down).
    /// Returns `None` for points behind the camera.
    pub fn project(&self, point: Vec3, viewport: (f64, f64)) -> Option<(f64, f64)> {
        let clip = self.view_projection() * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let x = (ndc.x as f64 + 1.0) / 2.0 * viewport.0;
        let y = (1.0 - ndc.y as f64) / 2.0 * viewport.1;
        Some((x, y))
    }
}

/// Persistent square drawable for one grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primitive {
    pub cell: CellCoordinates,
    /// Lower-left corner in world space.
    pub origin: Vec2,
    pub size: f32,
}

impl Primitive {
    pub fn corners(&self) -> [Vec3; 4] {
        let Vec2 { x, y } = self.origin;
        let s = self.size;
        [
            Vec3::new(x, y, 0.0),
            Vec3::new(x, y + s, 0.0),
            Vec3::new(x + s, y + s, 0.0),
            Vec3::new(x + s, y, 0.0),
        ]
    }
}

/// Set of primitive ids that are currently visible.
///
/// Membership changes are idempotent: adding a member or removing a
/// non-member does nothing.
#[derive(Debug, Clone, Default)]
pub struct Group {
    members: Vec<bool>,
    len: usize,
}

impl Group {
    pub fn with_capacity(primitives: usize) -> Self {
        Self {
            members: vec![false; primitives],
            len: 0,
        }
    }

    /// Returns `true` if `id` was not already a member.
    pub fn add(&mut self, id: usize) -> bool {
        let newly = !std::mem::replace(&mut self.members[id], true);
        self.len += newly as usize;
        newly
    }

    /// Returns `true` if `id` was a member.
    pub fn remove(&mut self, id: usize) -> bool {
        let was = std::mem::replace(&mut self.members[id], false);
        self.len -= was as usize;
        was
    }

    #[inline]
    pub fn contains(&self, id: usize) -> bool {
        self.members.get(id).copied().unwrap_or(false)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.members
            .iter()
            .enumerate()
            .filter_map(|(id, &member)| member.then_some(id))
    }
}

/// Retained scene: a background, the per-cell primitives, and the visible group.
#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Color,
    /// Color shared by every primitive.
    pub material: Color,
    primitives: Vec<Primitive>,
    group: Group,
}

impl Scene {
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    /// Visible primitives.
    pub fn visible(&self) -> impl Iterator<Item = &Primitive> + '_ {
        self.group.iter().map(|id| &self.primitives[id])
    }
}

/// Something that can draw a [`Scene`] onto a mounted viewport.
pub trait SceneRenderer {
    /// Viewport size in logical pixels.
    fn viewport(&self) -> (f64, f64);

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera);
}

/// Renders a scene by projecting each visible primitive onto a raster surface.
pub struct SoftwareRenderer<S: RasterSurface> {
    surface: S,
}

impl<S: RasterSurface> SoftwareRenderer<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

impl<S: RasterSurface> SceneRenderer for SoftwareRenderer<S> {
    fn viewport(&self) -> (f64, f64) {
        self.surface.size()
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) {
        let viewport = self.surface.size();
        self.surface.set_fill_color(scene.background);
        self.surface.fill_rect(0.0, 0.0, viewport.0, viewport.1);

        self.surface.set_fill_color(scene.material);
        for primitive in scene.visible() {
            // The camera never rotates, so a projected square stays axis-aligned.
            let mut min = (f64::INFINITY, f64::INFINITY);
            let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);
            for corner in primitive.corners() {
                let Some((x, y)) = camera.project(corner, viewport) else {
                    continue;
                };
                min = (min.0.min(x), min.1.min(y));
                max = (max.0.max(x), max.1.max(y));
            }
            if min.0 <= max.0 && min.1 <= max.1 {
                self.surface
                    .fill_rect(min.0, min.1, max.0 - min.0, max.1 - min.1);
            }
        }
    }
}

/// Scene-graph drawing backend.
pub struct SceneBackend<R: SceneRenderer> {
    palette: Palette,
    fov_degrees: f32,
    state: Option<SceneState<R>>,
}

struct SceneState<R> {
    renderer: R,
    scene: Scene,
    camera: PerspectiveCamera,
    cell_size: f64,
    width: u16,
    height: u16,
}

impl<R: SceneRenderer> SceneBackend<R> {
    /// Create an uninitialized backend whose camera uses `fov_degrees`.
    pub fn new(palette: Palette, fov_degrees: f32) -> Self {
        Self {
            palette,
            fov_degrees,
            state: None,
        }
    }

    /// Build the camera and one primitive per cell, adding the alive ones to
    /// the visible group, then render the initial scene.
    pub fn initialize<E: Engine + ?Sized>(
        &mut self,
        mut renderer: R,
        engine: &E,
    ) -> Result<(), RenderError> {
        let grid = GridView::from_engine(engine)?;
        let viewport = renderer.viewport();
        let cell_size = cell_size_for(viewport, grid.width(), grid.height())?;

        let size = cell_size as f32;
        let extent = Vec2::new(grid.width() as f32, grid.height() as f32) * size;
        let camera =
            PerspectiveCamera::framing(extent, self.fov_degrees, (viewport.0 / viewport.1) as f32);

        let cell_count = grid.width() as usize * grid.height() as usize;
        let mut primitives = Vec::with_capacity(cell_count);
        let mut group = Group::with_capacity(cell_count);
        for (id, (coords, cell)) in grid.iter().enumerate() {
            primitives.push(Primitive {
                cell: coords,
                origin: Vec2::new(coords.column() as f32, coords.row() as f32) * size,
                size,
            });
            if cell == Cell::Alive {
                group.add(id);
            }
        }

        let scene = Scene {
            background: self.palette.dead,
            material: self.palette.alive,
            primitives,
            group,
        };
        renderer.render(&scene, &camera);

        log::debug!(
            "Scene backend initialized: {} primitives, {} visible, camera at {:?}",
            cell_count,
            scene.group.len(),
            camera.position
        );

        self.state = Some(SceneState {
            renderer,
            scene,
            camera,
            cell_size,
            width: grid.width(),
            height: grid.height(),
        });
        Ok(())
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.state.as_ref().map(|state| &state.scene)
    }

    pub fn camera(&self) -> Option<&PerspectiveCamera> {
        self.state.as_ref().map(|state| &state.camera)
    }

    pub fn renderer(&self) -> Option<&R> {
        self.state.as_ref().map(|state| &state.renderer)
    }

    pub fn cell_size(&self) -> Option<f64> {
        self.state.as_ref().map(|state| state.cell_size)
    }

    /// Release the renderer and drop the scene.
    pub fn take_renderer(&mut self) -> Option<R> {
        self.state.take().map(|state| state.renderer)
    }
}

impl<R: SceneRenderer> RenderBackend for SceneBackend<R> {
    fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    fn draw_frame(&mut self, engine: &mut dyn Engine) -> Result<DrawSummary, RenderError> {
        let state = self.state.as_mut().ok_or(RenderError::NotInitialized)?;

        let mut summary = DrawSummary::default();
        {
            let changes = ChangeSet::from_engine(&*engine)?;
            ensure_dimensions(&changes.grid(), state.width, state.height)?;
            let grid = changes.grid();
            for (coords, cell) in changes.iter() {
                let id = grid.index(coords);
                if cell.is_alive() {
                    state.scene.group.add(id);
                    summary.alive += 1;
                } else {
                    state.scene.group.remove(id);
                    summary.dead += 1;
                }
            }
        }
        engine.clear_changed_cells();

        state.renderer.render(&state.scene, &state.camera);
        log::trace!(
            "Scene frame: {} alive, {} dead, {} visible",
            summary.alive,
            summary.dead,
            state.scene.group.len()
        );
        Ok(summary)
    }

    fn map_pointer(&self, pointer: &PointerInput) -> Result<CellCoordinates, RenderError> {
        let state = self.state.as_ref().ok_or(RenderError::NotInitialized)?;
        let position = pointer.surface_position(state.renderer.viewport());
        Ok(cell_at(
            position,
            state.cell_size,
            state.width,
            state.height,
            RowAxis::Up,
        ))
    }
}
