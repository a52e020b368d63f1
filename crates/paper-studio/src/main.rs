use anyhow::Result;

use paper_engine::RendererConfig;
use paper_engine::canvas::Canvas;
use paper_engine::coords::{IntRect, Rect, Vec2};
use paper_engine::core::{App, AppControl, FrameCtx};
use paper_engine::device::GpuInit;
use paper_engine::gpu::CanvasSurface;
use paper_engine::logging::{LoggingConfig, init_logging};
use paper_engine::paint::{Brush, Color32};
use paper_engine::render::CanvasRenderer;
use paper_engine::texture::TextureId;
use paper_engine::window::{Runtime, RuntimeConfig};

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};

const CHECKER_SIZE: u32 = 8;

const BACKGROUND: Color32 = Color32::from_hex(0x1E2230FF);
const PANEL: Color32 = Color32::from_hex(0x2F6FDEFF);

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let studio = Studio::new()?;
    Runtime::run(
        RuntimeConfig {
            title: "paper studio".to_string(),
            ..RuntimeConfig::default()
        },
        GpuInit::default(),
        studio,
    )
}

/// Rebuilds and renders a small canvas scene every frame.
struct Studio {
    renderer: CanvasRenderer,
    surface: CanvasSurface,
    canvas: Canvas,
    checker: TextureId,
}

impl Studio {
    fn new() -> Result<Self> {
        let mut renderer = CanvasRenderer::new(RendererConfig::default())?;

        let checker = renderer.create_texture(1, 1)?;
        renderer.set_texture_data(
            checker,
            IntRect::from_size(CHECKER_SIZE, CHECKER_SIZE),
            &checker_pixels(CHECKER_SIZE),
        )?;

        Ok(Self {
            renderer,
            surface: CanvasSurface::new(),
            canvas: Canvas::new(),
            checker,
        })
    }

    fn build_scene(&mut self, size: Vec2, frame_index: u64) {
        let canvas = &mut self.canvas;
        canvas.clear();

        canvas.fill_rect(Rect::new(0.0, 0.0, size.x, size.y), BACKGROUND);

        // Gradient panel.
        let panel = Rect::new(40.0, 40.0, 320.0, 180.0);
        canvas.set_brush(Brush::linear_gradient(
            panel.min(),
            Vec2::new(panel.max().x, panel.min().y),
            PANEL,
            Color32::from_hex(0x9B4DE0FF),
        ));
        canvas.fill_rect(panel, Color32::WHITE);

        // Soft shadow under a card.
        let card = Rect::new(400.0, 60.0, 240.0, 140.0);
        canvas.set_brush(Brush::box_gradient(
            card,
            12.0,
            24.0,
            Color32::from_rgba(0, 0, 0, 160),
            Color32::TRANSPARENT,
        ));
        canvas.fill_rect(Rect::new(380.0, 40.0, 280.0, 180.0), Color32::WHITE);
        canvas.set_brush(Brush::none());
        canvas.fill_rect(card, Color32::from_hex(0xF2F2F2FF));

        // Pulsing radial spot.
        let t = (frame_index % 240) as f32 / 240.0;
        let radius = 60.0 + 30.0 * (t * std::f32::consts::TAU).sin();
        let center = Vec2::new(200.0, 380.0);
        canvas.set_brush(Brush::radial_gradient(
            center,
            radius * 0.25,
            radius,
            Color32::from_hex(0xFFD25AFF),
            Color32::from_rgba(255, 210, 90, 0),
        ));
        canvas.fill_rect(
            Rect::new(center.x - 100.0, center.y - 100.0, 200.0, 200.0),
            Color32::WHITE,
        );
        canvas.set_brush(Brush::none());

        // Textured quad clipped to a scissor smaller than itself.
        let quad = Rect::new(420.0, 280.0, 220.0, 220.0);
        canvas.set_scissor(Rect::new(450.0, 310.0, 160.0, 160.0));
        canvas.set_texture(Some(self.checker));
        canvas.fill_rect(quad, Color32::WHITE);
        canvas.set_texture(None);
        canvas.reset_scissor();
    }
}

impl App for Studio {
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape) =>
            {
                AppControl::Exit
            }
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        self.build_scene(ctx.logical_size(), ctx.frame_index);

        if let Err(err) = self.renderer.render_canvas(&self.canvas, &mut self.surface) {
            log::warn!("frame {} skipped: {err}", ctx.frame_index);
            return AppControl::Continue;
        }

        let (surface, renderer) = (&mut self.surface, &self.renderer);
        ctx.render(Color32::BLACK, |rctx, target| {
            surface.draw(rctx, target, renderer.textures());
        })
    }
}

fn checker_pixels(size: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let light = (x + y) % 2 == 0;
            let c = if light { 230 } else { 40 };
            pixels.extend_from_slice(&[c, c, c, 255]);
        }
    }
    pixels
}
