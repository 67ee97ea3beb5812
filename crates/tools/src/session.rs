//! Frame-driven tool session.
//!
//! One [`ToolSession`] per editor scene owns everything the brush tools
//! share: the prefab palette, the spatial index of painted objects, the
//! session settings, and the active tool. [`ToolSession::update`] is the
//! single per-frame entry point; within one frame, control-point mutation
//! always precedes slot generation, which precedes transform resolution,
//! which precedes preview or commit. Hosts must preserve that ordering by
//! calling nothing else between frames.

use std::collections::HashMap;

use placement::probe::{PlaneProbe, ProbeFilter, SurfaceProbe};
use placement::resolve::{ResolveContext, resolve_batch};
use placement::settings::ConformSettings;
use placement::types::{
    ObjectId, PaintMode, PrefabDescriptor, PrefabId, ResolvedTransform, StrokeId, StrokeSlot,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::commit::PlacementSink;
use crate::input::FrameInput;
use crate::line::{LineData, LineTool};
use crate::pin::{PinData, PinTool};
use crate::select::{SelectMode, SelectTool};
use crate::shape::{ShapeData, ShapeTool};
use crate::tiling::{TilingData, TilingTool};
use crate::tool::ToolContext;
use crate::wall::{WallData, WallTool};

pub use placement::spatial::PaintedIndex;

/// Session-wide placement settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    pub paint_mode: PaintMode,
    pub conform: ConformSettings,
    /// Host scene layer committed instances land on.
    pub layer: u32,
    /// Parent committed instances attach under.
    pub parent: Option<ObjectId>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            paint_mode: PaintMode::Auto,
            conform: ConformSettings::default(),
            layer: 0,
            parent: None,
        }
    }
}

/// The tool currently driving the session.
#[derive(Debug)]
pub enum ActiveTool {
    Shape(ShapeTool),
    Tiling(TilingTool),
    Wall(WallTool),
    Line(LineTool),
    Pin(PinTool),
    Select(SelectTool),
}

impl ActiveTool {
    fn handle_input(&mut self, input: &FrameInput, ctx: &ToolContext) {
        match self {
            ActiveTool::Shape(tool) => tool.handle_input(input, ctx),
            ActiveTool::Tiling(tool) => tool.handle_input(input, ctx),
            ActiveTool::Wall(tool) => tool.handle_input(input, ctx),
            ActiveTool::Line(tool) => tool.handle_input(input, ctx),
            ActiveTool::Pin(tool) => tool.handle_input(input, ctx),
            ActiveTool::Select(tool) => tool.handle_input(input, ctx),
        }
    }

    fn slots(&self, ctx: &ToolContext) -> Vec<StrokeSlot> {
        match self {
            ActiveTool::Shape(tool) => tool.slots(ctx),
            ActiveTool::Tiling(tool) => tool.slots(ctx),
            ActiveTool::Wall(tool) => tool.slots(ctx),
            ActiveTool::Line(tool) => tool.slots(ctx),
            ActiveTool::Pin(tool) => tool.slots(ctx),
            ActiveTool::Select(_) => Vec::new(),
        }
    }

    fn take_commit_request(&mut self) -> bool {
        match self {
            ActiveTool::Shape(tool) => tool.take_commit_request(),
            ActiveTool::Tiling(tool) => tool.take_commit_request(),
            ActiveTool::Wall(tool) => tool.take_commit_request(),
            ActiveTool::Line(tool) => tool.take_commit_request(),
            ActiveTool::Pin(tool) => tool.take_commit_request(),
            ActiveTool::Select(_) => false,
        }
    }

    fn reset(&mut self) {
        match self {
            ActiveTool::Shape(tool) => tool.reset(),
            ActiveTool::Tiling(tool) => tool.reset(),
            ActiveTool::Wall(tool) => tool.reset(),
            ActiveTool::Line(tool) => tool.reset(),
            ActiveTool::Pin(tool) => tool.reset(),
            ActiveTool::Select(tool) => tool.reset(),
        }
    }

    /// The stroke's own plane for ON_SHAPE fallback, when the tool has one.
    fn stroke_plane(&self) -> Option<PlaneProbe> {
        match self {
            ActiveTool::Shape(tool) => Some(tool.plane()),
            ActiveTool::Tiling(tool) => Some(tool.plane()),
            _ => None,
        }
    }

    /// Control-point snapshot recorded with a commit.
    fn persistent_data(&self) -> PersistentData {
        match self {
            ActiveTool::Shape(tool) => PersistentData::Shape(*tool.data()),
            ActiveTool::Tiling(tool) => PersistentData::Tiling(*tool.data()),
            ActiveTool::Wall(tool) => PersistentData::Wall(*tool.data()),
            ActiveTool::Line(tool) => PersistentData::Line(tool.data().clone()),
            ActiveTool::Pin(tool) => PersistentData::Pin(*tool.data()),
            ActiveTool::Select(_) => PersistentData::None,
        }
    }
}

/// Control-point snapshot of a committed stroke, editable later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PersistentData {
    None,
    Shape(ShapeData),
    Tiling(TilingData),
    Wall(WallData),
    Line(LineData),
    Pin(PinData),
}

/// One committed stroke: its id, prefab, control points, and the objects it
/// placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistentItem {
    pub stroke: StrokeId,
    pub prefab: PrefabId,
    pub data: PersistentData,
    pub objects: Vec<ObjectId>,
}

/// What one frame produced.
#[derive(Debug, Default)]
pub struct FrameOutput {
    /// Transforms to draw as the live preview.
    pub preview: Vec<ResolvedTransform>,
    /// Stroke committed this frame, if any.
    pub committed: Option<StrokeId>,
    /// Objects selected by the circle tool this frame.
    pub selection: Vec<ObjectId>,
    /// Objects erased this frame; the host must destroy their instances.
    pub erased: Vec<ObjectId>,
}

/// Per-scene tool session context.
pub struct ToolSession {
    palette: HashMap<PrefabId, PrefabDescriptor>,
    active_prefab: Option<PrefabId>,
    pub settings: SessionSettings,
    filter: ProbeFilter,
    index: PaintedIndex,
    tool: ActiveTool,
    committed: Vec<PersistentItem>,
    next_stroke: u64,
    next_object: u64,
}

impl Default for ToolSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolSession {
    pub fn new() -> Self {
        Self {
            palette: HashMap::new(),
            active_prefab: None,
            settings: SessionSettings::default(),
            filter: ProbeFilter::default(),
            index: PaintedIndex::default(),
            tool: ActiveTool::Pin(PinTool::default()),
            committed: Vec::new(),
            next_stroke: 0,
            next_object: 0,
        }
    }

    /// Add a prefab to the palette; the first registered prefab becomes
    /// active.
    pub fn register_prefab(&mut self, descriptor: PrefabDescriptor) {
        if self.active_prefab.is_none() {
            self.active_prefab = Some(descriptor.id);
        }
        self.palette.insert(descriptor.id, descriptor);
    }

    pub fn set_active_prefab(&mut self, id: PrefabId) -> bool {
        if self.palette.contains_key(&id) {
            self.active_prefab = Some(id);
            true
        } else {
            false
        }
    }

    pub fn active_prefab(&self) -> Option<PrefabId> {
        self.active_prefab
    }

    /// Switch tools, discarding any in-progress stroke.
    pub fn set_tool(&mut self, tool: ActiveTool) {
        info!("session: tool switched");
        self.tool = tool;
    }

    pub fn tool(&self) -> &ActiveTool {
        &self.tool
    }

    pub fn tool_mut(&mut self) -> &mut ActiveTool {
        &mut self.tool
    }

    pub fn index(&self) -> &PaintedIndex {
        &self.index
    }

    pub fn filter(&self) -> &ProbeFilter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut ProbeFilter {
        &mut self.filter
    }

    /// Strokes committed so far, newest last.
    pub fn committed_items(&self) -> &[PersistentItem] {
        &self.committed
    }

    /// Drop an object the host destroyed externally since last frame.
    ///
    /// The object leaves the spatial index and its stroke's record; nothing
    /// else in the session cares that it ever existed.
    pub fn forget_object(&mut self, id: ObjectId) -> bool {
        let removed = self.index.remove(id);
        if removed {
            for item in &mut self.committed {
                item.objects.retain(|&o| o != id);
            }
        }
        removed
    }

    /// Run one editor frame.
    pub fn update(
        &mut self,
        input: &FrameInput,
        probe: &dyn SurfaceProbe,
        sink: &mut dyn PlacementSink,
    ) -> FrameOutput {
        let mut output = FrameOutput::default();
        let Some(descriptor) = self
            .active_prefab
            .and_then(|id| self.palette.get(&id))
            .copied()
        else {
            return output;
        };

        // Control-point mutation always comes first
        self.tool.handle_input(
            input,
            &ToolContext {
                probe,
                filter: &self.filter,
                index: &self.index,
                descriptor,
            },
        );

        // Circle tool actions touch the index directly and place nothing
        if matches!(self.tool, ActiveTool::Select(_)) {
            let action = match &mut self.tool {
                ActiveTool::Select(select) => select.take_action(),
                _ => None,
            };
            if let Some((mode, targets)) = action {
                self.apply_select_action(mode, targets, descriptor, probe, sink, &mut output);
            }
            return output;
        }

        // Generate, then resolve
        let slots = self.tool.slots(&ToolContext {
            probe,
            filter: &self.filter,
            index: &self.index,
            descriptor,
        });
        let transforms = self.resolve(&slots, &descriptor, probe);

        // Commit or preview
        if self.tool.take_commit_request() {
            if transforms.is_empty() {
                warn!("session: commit requested with no resolvable placements");
                self.tool.reset();
            } else {
                let data = self.tool.persistent_data();
                if let Some(stroke) =
                    self.commit_transforms(&transforms, &descriptor, data, sink)
                {
                    output.committed = Some(stroke);
                    self.tool.reset();
                }
                // On sink failure the tool keeps its state for a retry
            }
        } else {
            output.preview = transforms;
        }
        output
    }

    fn resolve(
        &self,
        slots: &[StrokeSlot],
        descriptor: &PrefabDescriptor,
        probe: &dyn SurfaceProbe,
    ) -> Vec<ResolvedTransform> {
        let mut ctx = ResolveContext::new(probe, &self.filter);
        ctx.layer = self.settings.layer;
        ctx.parent = self.settings.parent;
        if self.settings.paint_mode == PaintMode::OnShape {
            if let Some(plane) = self.tool.stroke_plane() {
                ctx = ctx.with_fallback_plane(plane);
            }
        }
        resolve_batch(
            slots,
            descriptor,
            &self.settings.conform,
            self.settings.paint_mode,
            &ctx,
        )
    }

    fn apply_select_action(
        &mut self,
        mode: SelectMode,
        targets: Vec<ObjectId>,
        descriptor: PrefabDescriptor,
        probe: &dyn SurfaceProbe,
        sink: &mut dyn PlacementSink,
        output: &mut FrameOutput,
    ) {
        match mode {
            SelectMode::Select => output.selection = targets,
            SelectMode::Erase => {
                for id in &targets {
                    self.index.remove(*id);
                }
                info!("session: erased {} objects", targets.len());
                output.erased = targets;
            }
            SelectMode::Replace => {
                let slots: Vec<StrokeSlot> = targets
                    .iter()
                    .enumerate()
                    .filter_map(|(i, id)| {
                        self.index
                            .bounds_of(*id)
                            .map(|b| StrokeSlot::new(descriptor.id, b.center(), i as u32))
                    })
                    .collect();
                let transforms = self.resolve(&slots, &descriptor, probe);
                if transforms.is_empty() {
                    return;
                }
                if let Some(stroke) =
                    self.commit_transforms(&transforms, &descriptor, PersistentData::None, sink)
                {
                    for id in &targets {
                        self.index.remove(*id);
                    }
                    info!(
                        "session: replaced {} objects under stroke {:?}",
                        targets.len(),
                        stroke
                    );
                    output.erased = targets;
                    output.committed = Some(stroke);
                }
            }
        }
    }

    fn commit_transforms(
        &mut self,
        transforms: &[ResolvedTransform],
        descriptor: &PrefabDescriptor,
        data: PersistentData,
        sink: &mut dyn PlacementSink,
    ) -> Option<StrokeId> {
        let stroke = StrokeId(self.next_stroke);
        if let Err(err) = sink.commit_batch(stroke, transforms, descriptor.id) {
            warn!("session: commit of stroke {:?} failed: {err}", stroke);
            return None;
        }
        self.next_stroke += 1;

        let mut objects = Vec::with_capacity(transforms.len());
        for transform in transforms {
            let id = ObjectId(self.next_object);
            self.next_object += 1;
            let bounds = descriptor
                .footprint
                .transformed(transform.position, transform.rotation);
            self.index.insert(id, bounds);
            objects.push(id);
        }

        info!(
            "session: committed stroke {:?} with {} placements",
            stroke,
            objects.len()
        );
        self.committed.push(PersistentItem {
            stroke,
            prefab: descriptor.id,
            data,
            objects,
        });
        Some(stroke)
    }
}
