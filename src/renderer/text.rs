use crate::game::CubeState;
use glyphon::{
    Attrs, Buffer, Cache, Color, Family, FontSystem, Metrics, Resolution, Shaping, Style,
    SwashCache, TextArea, TextAtlas, TextBounds, TextRenderer as GlyphonTextRenderer, Viewport,
    Weight,
};
use std::collections::HashMap;
use wgpu::{Device, Queue, RenderPass, SurfaceConfiguration};
use winit::window::Window;

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f32,
    pub line_height: f32,
    pub color: Color,
    pub weight: Weight,
    pub style: Style,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "DejaVu Sans".to_string(), // Common system font
            font_size: 16.0,
            line_height: 20.0,
            color: Color::rgb(255, 255, 255),
            weight: Weight::NORMAL,
            style: Style::Normal,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TextPosition {
    pub x: f32,
    pub y: f32,
    pub max_width: Option<f32>,
    pub max_height: Option<f32>,
}

#[derive(Debug)]
pub struct TextBuffer {
    pub buffer: Buffer,
    pub style: TextStyle,
    pub position: TextPosition,
    pub scale: f32,
    pub visible: bool,
    pub text_content: String,
}

pub struct TextRenderer {
    pub font_system: FontSystem,
    pub swash_cache: SwashCache,
    pub viewport: Viewport,
    pub atlas: TextAtlas,
    pub text_renderer: GlyphonTextRenderer,
    pub text_buffers: HashMap<String, TextBuffer>,
    pub window_scale_factor: f32,
    pub window_size: winit::dpi::PhysicalSize<u32>,
}

impl TextRenderer {
    pub fn new(
        device: &Device,
        queue: &Queue,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let font_system = FontSystem::new();
        let swash_cache = SwashCache::new();
        let cache = Cache::new(device);
        let viewport = Viewport::new(device, &cache);
        let mut atlas = TextAtlas::new(device, queue, &cache, surface_format);
        let text_renderer =
            GlyphonTextRenderer::new(&mut atlas, device, wgpu::MultisampleState::default(), None);

        let scale_factor = window.scale_factor() as f32;
        let size = window.inner_size();

        Self {
            font_system,
            swash_cache,
            viewport,
            atlas,
            text_renderer,
            text_buffers: HashMap::new(),
            window_scale_factor: scale_factor,
            window_size: size,
        }
    }

    /// Create the overlay elements: status line, FPS counter, turn log, and
    /// the key help footer.
    pub fn initialize_overlay(&mut self, height: u32) {
        let status_style = TextStyle {
            font_size: 22.0,
            line_height: 28.0,
            color: Color::rgb(150, 255, 150),
            weight: Weight::BOLD,
            ..Default::default()
        };
        let status_position = TextPosition {
            x: 20.0,
            y: 16.0,
            max_width: Some(400.0),
            max_height: Some(32.0),
        };
        self.create_text_buffer("status", "idle", Some(status_style), Some(status_position));

        let fps_style = TextStyle {
            font_size: 14.0,
            line_height: 18.0,
            color: Color::rgb(180, 180, 180),
            ..Default::default()
        };
        let fps_position = TextPosition {
            x: 20.0,
            y: 48.0,
            max_width: Some(120.0),
            max_height: Some(22.0),
        };
        self.create_text_buffer("fps", "", Some(fps_style), Some(fps_position));

        let log_style = TextStyle {
            font_size: 14.0,
            line_height: 18.0,
            color: Color::rgb(220, 220, 160),
            ..Default::default()
        };
        let log_position = TextPosition {
            x: 20.0,
            y: 80.0,
            max_width: Some(360.0),
            max_height: Some(200.0),
        };
        self.create_text_buffer("turn_log", "", Some(log_style), Some(log_position));

        let help_style = TextStyle {
            font_size: 14.0,
            line_height: 18.0,
            color: Color::rgb(150, 150, 170),
            ..Default::default()
        };
        let help_position = TextPosition {
            x: 20.0,
            y: height as f32 - 36.0,
            max_width: Some(700.0),
            max_height: Some(24.0),
        };
        self.create_text_buffer(
            "help",
            "drag a face to turn | drag background to orbit | scroll to zoom | S scramble | R reset | Q quit",
            Some(help_style),
            Some(help_position),
        );
    }

    /// Refresh overlay text from the cube state. Call every frame.
    pub fn update_overlay(&mut self, cube: &CubeState) {
        let status = cube.status_text();
        if let Err(e) = self.update_text("status", &status) {
            println!("Failed to update status text: {}", e);
        }

        let fps = format!("{} fps", cube.current_fps);
        if let Err(e) = self.update_text("fps", &fps) {
            println!("Failed to update fps text: {}", e);
        }

        let log: Vec<&str> = cube.turn_log.iter().map(String::as_str).collect();
        if let Err(e) = self.update_text("turn_log", &log.join("\n")) {
            println!("Failed to update turn log text: {}", e);
        }
    }

    /// Create a new text buffer with the given ID, text, style, and position.
    pub fn create_text_buffer(
        &mut self,
        id: &str,
        text: &str,
        style: Option<TextStyle>,
        position: Option<TextPosition>,
    ) {
        let style = style.unwrap_or_default();
        let position = position.unwrap_or_default();

        let metrics = Metrics::new(style.font_size, style.line_height);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);

        let width = position.max_width.unwrap_or(self.window_size.width as f32);
        let height = position
            .max_height
            .unwrap_or(self.window_size.height as f32);
        buffer.set_size(&mut self.font_system, Some(width), Some(height));

        let attrs = Attrs::new()
            .family(Family::Name(&style.font_family))
            .weight(style.weight)
            .style(style.style);

        buffer.set_text(&mut self.font_system, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let text_buffer = TextBuffer {
            buffer,
            style,
            position,
            scale: 1.0,
            visible: true,
            text_content: text.to_string(),
        };

        self.text_buffers.insert(id.to_string(), text_buffer);
    }

    /// Update the text content of an existing buffer.
    pub fn update_text(&mut self, id: &str, text: &str) -> Result<(), String> {
        let text_buffer = self
            .text_buffers
            .get_mut(id)
            .ok_or_else(|| format!("Text buffer '{}' not found", id))?;

        if text_buffer.text_content == text {
            return Ok(());
        }

        let attrs = Attrs::new()
            .family(Family::Name(&text_buffer.style.font_family))
            .weight(text_buffer.style.weight)
            .style(text_buffer.style.style);

        text_buffer
            .buffer
            .set_text(&mut self.font_system, text, attrs, Shaping::Advanced);
        text_buffer
            .buffer
            .shape_until_scroll(&mut self.font_system, false);

        text_buffer.text_content = text.to_string();
        Ok(())
    }

    /// Update the position of an existing buffer.
    pub fn update_position(&mut self, id: &str, position: TextPosition) -> Result<(), String> {
        let text_buffer = self
            .text_buffers
            .get_mut(id)
            .ok_or_else(|| format!("Text buffer '{}' not found", id))?;

        if text_buffer.position.max_width != position.max_width
            || text_buffer.position.max_height != position.max_height
        {
            let width = position.max_width.unwrap_or(self.window_size.width as f32);
            let height = position
                .max_height
                .unwrap_or(self.window_size.height as f32);
            text_buffer
                .buffer
                .set_size(&mut self.font_system, Some(width), Some(height));
        }

        text_buffer.position = position;
        Ok(())
    }

    /// Resize the viewport to the current surface resolution.
    pub fn resize(&mut self, queue: &Queue, resolution: Resolution) {
        self.viewport.update(queue, resolution);
    }

    /// Prepare text rendering for the current frame.
    pub fn prepare(
        &mut self,
        device: &Device,
        queue: &Queue,
        surface_config: &SurfaceConfiguration,
    ) -> Result<(), glyphon::PrepareError> {
        let text_areas: Vec<TextArea> = self
            .text_buffers
            .iter()
            .filter(|(_, buffer)| buffer.visible)
            .map(|(_, buffer)| TextArea {
                buffer: &buffer.buffer,
                left: buffer.position.x,
                top: buffer.position.y,
                scale: buffer.scale * self.window_scale_factor,
                bounds: TextBounds {
                    left: buffer.position.x as i32,
                    top: buffer.position.y as i32,
                    right: (buffer.position.x
                        + buffer
                            .position
                            .max_width
                            .unwrap_or(surface_config.width as f32))
                        as i32,
                    bottom: (buffer.position.y
                        + buffer
                            .position
                            .max_height
                            .unwrap_or(surface_config.height as f32))
                        as i32,
                },
                default_color: buffer.style.color,
                custom_glyphs: &[],
            })
            .collect();

        self.text_renderer.prepare(
            device,
            queue,
            &mut self.font_system,
            &mut self.atlas,
            &self.viewport,
            text_areas,
            &mut self.swash_cache,
        )?;

        Ok(())
    }

    /// Render all visible text buffers.
    pub fn render(&mut self, render_pass: &mut RenderPass) -> Result<(), glyphon::RenderError> {
        self.text_renderer
            .render(&self.atlas, &self.viewport, render_pass)?;
        Ok(())
    }

    /// Trim the atlas to free up unused space.
    pub fn trim(&mut self) {
        self.atlas.trim();
    }
}
