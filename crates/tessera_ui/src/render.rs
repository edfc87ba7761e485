//! 2D overlay command recording.
//!
//! Screens never talk to the graphics backend directly. They record
//! commands into a [`UIRenderer`] during the 2D pass; the session hands the
//! finished batches to the backend in one go.

use crate::layout::Rect;
use crate::style::Color;

/// One overlay draw.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Filled rectangle.
    Rect {
        /// Bounds.
        bounds: Rect,
        /// Fill.
        color: Color,
    },
    /// Text run. Color codes are already resolved.
    Text {
        /// Content.
        text: String,
        /// Left edge.
        x: f32,
        /// Baseline.
        y: f32,
        /// Color.
        color: Color,
        /// Font size in pixels.
        font_size: f32,
    },
    /// Textured quad.
    Texture {
        /// Bounds.
        bounds: Rect,
        /// Backend texture id.
        texture_id: u32,
        /// UV rectangle (u0, v0, u1, v1).
        uv: [f32; 4],
        /// Tint.
        color: Color,
    },
    /// Clip subsequent commands.
    PushClip {
        /// Clip bounds.
        bounds: Rect,
    },
    /// Restore the previous clip.
    PopClip,
}

/// Commands recorded by one layer of the overlay.
#[derive(Debug, Clone, Default)]
pub struct UIBatch {
    /// Layer name for diagnostics (`"fps"`, `"hud"`, screen names).
    pub layer: String,
    /// Commands in submission order.
    pub commands: Vec<RenderCommand>,
}

impl UIBatch {
    /// Tessellates quads into `out`, six vertices per rectangle.
    ///
    /// Text is left to the backend's font renderer and is skipped here.
    pub fn build_vertices(&self, out: &mut Vec<UIVertex>) {
        for command in &self.commands {
            match command {
                RenderCommand::Rect { bounds, color } => {
                    push_quad(out, bounds, [0.0, 0.0, 0.0, 0.0], *color);
                }
                RenderCommand::Texture { bounds, uv, color, .. } => {
                    push_quad(out, bounds, *uv, *color);
                }
                RenderCommand::Text { .. } | RenderCommand::PushClip { .. } | RenderCommand::PopClip => {}
            }
        }
    }
}

fn push_quad(out: &mut Vec<UIVertex>, r: &Rect, uv: [f32; 4], color: Color) {
    let c = color.to_array();
    let [u0, v0, u1, v1] = uv;
    let tl = UIVertex::new(r.x, r.y, u0, v0, c);
    let tr = UIVertex::new(r.right(), r.y, u1, v0, c);
    let bl = UIVertex::new(r.x, r.bottom(), u0, v1, c);
    let br = UIVertex::new(r.right(), r.bottom(), u1, v1, c);
    out.extend_from_slice(&[tl, tr, br, tl, br, bl]);
}

/// Records overlay commands for a frame.
#[derive(Debug)]
pub struct UIRenderer {
    /// Client area of the window.
    viewport: Rect,
    /// Closed layers.
    batches: Vec<UIBatch>,
    /// Layer being recorded.
    current: UIBatch,
    /// Clip stack depth check.
    clip_stack: Vec<Rect>,
}

impl UIRenderer {
    /// Creates an idle renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            viewport: Rect::ZERO,
            batches: Vec::with_capacity(8),
            current: UIBatch::default(),
            clip_stack: Vec::with_capacity(8),
        }
    }

    /// Starts a frame over the given client area.
    pub fn begin_frame(&mut self, viewport: Rect) {
        self.viewport = viewport;
        self.batches.clear();
        self.current = UIBatch::default();
        self.clip_stack.clear();
    }

    /// Closes the current layer and opens a new one named `name`.
    pub fn begin_layer(&mut self, name: &str) {
        self.flush_layer();
        self.current.layer = name.to_owned();
    }

    /// Client area of the window.
    #[must_use]
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Records a command.
    pub fn push(&mut self, command: RenderCommand) {
        self.current.commands.push(command);
    }

    /// Records a filled rectangle.
    pub fn fill(&mut self, bounds: Rect, color: Color) {
        self.push(RenderCommand::Rect { bounds, color });
    }

    /// Records text with inline color codes resolved into runs.
    pub fn text(&mut self, text: &str, x: f32, y: f32, font_size: f32, base: Color) {
        let mut cursor = x;
        for (color, run) in crate::style::split_color_runs(text, base) {
            let advance = run.chars().count() as f32 * font_size * 0.5;
            self.push(RenderCommand::Text {
                text: run,
                x: cursor,
                y,
                color,
                font_size,
            });
            cursor += advance;
        }
    }

    /// Pushes a clip rect, intersected with the enclosing one.
    pub fn push_clip(&mut self, bounds: Rect) {
        let clip = match self.clip_stack.last() {
            Some(outer) => outer.intersection(&bounds).unwrap_or(Rect::ZERO),
            None => bounds,
        };
        self.clip_stack.push(clip);
        self.push(RenderCommand::PushClip { bounds: clip });
    }

    /// Pops the innermost clip rect.
    pub fn pop_clip(&mut self) {
        if self.clip_stack.pop().is_some() {
            self.push(RenderCommand::PopClip);
        }
    }

    /// Ends the frame and returns the recorded layers.
    pub fn end_frame(&mut self) -> &[UIBatch] {
        while self.clip_stack.pop().is_some() {
            self.current.commands.push(RenderCommand::PopClip);
        }
        self.flush_layer();
        &self.batches
    }

    /// Layers closed so far this frame.
    #[must_use]
    pub fn batches(&self) -> &[UIBatch] {
        &self.batches
    }

    fn flush_layer(&mut self) {
        if !self.current.commands.is_empty() {
            self.batches.push(std::mem::take(&mut self.current));
        } else {
            self.current.layer.clear();
        }
    }
}

impl Default for UIRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Overlay vertex as uploaded to the backend.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct UIVertex {
    /// Position in window pixels.
    pub position: [f32; 2],
    /// Texture coordinates.
    pub uv: [f32; 2],
    /// RGBA.
    pub color: [f32; 4],
}

impl UIVertex {
    /// Creates a vertex.
    #[must_use]
    pub const fn new(x: f32, y: f32, u: f32, v: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
            color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_are_split() {
        let mut ui = UIRenderer::new();
        ui.begin_frame(Rect::window(640, 480));
        ui.begin_layer("hud");
        ui.fill(Rect::new(0.0, 0.0, 4.0, 4.0), Color::WHITE);
        ui.begin_layer("empty");
        ui.begin_layer("pause");
        ui.fill(Rect::new(0.0, 0.0, 8.0, 8.0), Color::BLACK);

        let batches = ui.end_frame();

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].layer, "hud");
        assert_eq!(batches[1].layer, "pause");
    }

    #[test]
    fn test_text_resolves_color_codes() {
        let mut ui = UIRenderer::new();
        ui.begin_frame(Rect::window(640, 480));
        ui.text("&eHello &fworld", 0.0, 0.0, 16.0, Color::WHITE);
        let batches = ui.end_frame();
        assert_eq!(batches[0].commands.len(), 2);
        match &batches[0].commands[1] {
            RenderCommand::Text { text, x, .. } => {
                assert_eq!(text, "world");
                assert!((x - 48.0).abs() < f32::EPSILON);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_unbalanced_clips_are_closed() {
        let mut ui = UIRenderer::new();
        ui.begin_frame(Rect::window(100, 100));
        ui.push_clip(Rect::new(0.0, 0.0, 50.0, 50.0));
        ui.push_clip(Rect::new(25.0, 25.0, 50.0, 50.0));
        let batches = ui.end_frame();
        let pops = batches[0]
            .commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::PopClip))
            .count();
        assert_eq!(pops, 2);
        assert_eq!(
            batches[0].commands[1],
            RenderCommand::PushClip {
                bounds: Rect::new(25.0, 25.0, 25.0, 25.0)
            }
        );
    }

    #[test]
    fn test_quads_tessellate_to_six_vertices() {
        let batch = UIBatch {
            layer: "hud".into(),
            commands: vec![
                RenderCommand::Rect {
                    bounds: Rect::new(0.0, 0.0, 1.0, 1.0),
                    color: Color::WHITE,
                },
                RenderCommand::PopClip,
            ],
        };
        let mut verts = Vec::new();
        batch.build_vertices(&mut verts);
        assert_eq!(verts.len(), 6);
        assert_eq!(verts[2].position, [1.0, 1.0]);
    }
}
