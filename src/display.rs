use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;
const PIXEL_COUNT: usize = DISPLAY_WIDTH * DISPLAY_HEIGHT;

/// The 64x32 monochrome plane the execution core draws into.
///
/// Drawing only ever touches the back plane. `present` copies it to the front
/// plane, which is the only thing a `Display` gets to see, so a half-drawn
/// sprite never makes it to the screen.
#[derive(Clone)]
pub struct FrameBuffer {
    back: [bool; PIXEL_COUNT],
    front: [bool; PIXEL_COUNT],
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            back: [false; PIXEL_COUNT],
            front: [false; PIXEL_COUNT],
        }
    }

    /// turn every back-plane pixel off; the screen keeps the old frame until
    /// the next `present`
    pub fn clear(&mut self) {
        self.back = [false; PIXEL_COUNT];
    }

    /// blank both planes, for when a session is thrown away
    pub fn reset(&mut self) {
        self.back = [false; PIXEL_COUNT];
        self.front = [false; PIXEL_COUNT];
    }

    /// flip one pixel and return what it was before. Coordinates wrap, so
    /// (64, 33) is (0, 1).
    pub fn toggle_pixel(&mut self, x: u8, y: u8) -> bool {
        let i = Self::index(x, y);
        let was_on = self.back[i];
        self.back[i] = !was_on;
        was_on
    }

    /// back-plane state of a pixel, same wrapping as `toggle_pixel`
    pub fn pixel(&self, x: u8, y: u8) -> bool {
        self.back[Self::index(x, y)]
    }

    pub fn present(&mut self) {
        self.front = self.back;
    }

    /// row-major front plane, what a `Display` should render
    pub fn presented(&self) -> &[bool] {
        &self.front
    }

    fn index(x: u8, y: u8) -> usize {
        (y as usize % DISPLAY_HEIGHT) * DISPLAY_WIDTH + (x as usize % DISPLAY_WIDTH)
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Display is used by the frontend to put a presented frame on a screen. It
/// should abstract the implementation details, so a variety of kinds of screen
/// would work.
pub trait Display {
    /// draw a row-major 64x32 plane, `true` being lit
    fn draw(&mut self, pixels: &[bool]) -> Result<(), io::Error>;
}

// logical resolution and how it maps onto canvas coordinates
struct Resolution(usize, usize);

impl Resolution {
    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.0 - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.1 - 1) as f64, 0.0]
    }

    fn lit_points(&self, pixels: &[bool]) -> Vec<(f64, f64)> {
        let w = self.0;
        pixels
            .iter()
            .enumerate()
            .filter(|(_, &on)| on)
            .map(|(i, _)| ((i % w) as f64, -1.0 * (i / w) as f64))
            .collect()
    }
}

/// monochrome display in a terminal, rendered using TUI and crossterm; one
/// terminal cell per pixel so there's no smoothing to speak of
pub struct TermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    resolution: Resolution,
}

impl TermDisplay {
    pub fn new() -> Result<TermDisplay, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        terminal.hide_cursor()?;
        Ok(TermDisplay {
            terminal,
            resolution: Resolution(DISPLAY_WIDTH, DISPLAY_HEIGHT),
        })
    }
}

impl Drop for TermDisplay {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
    }
}

impl Display for TermDisplay {
    fn draw(&mut self, pixels: &[bool]) -> Result<(), io::Error> {
        assert_eq!(
            pixels.len(),
            PIXEL_COUNT,
            "TermDisplay must have a whole 64x32 plane to draw"
        );
        let coords = self.resolution.lit_points(pixels);
        let resolution = &self.resolution;

        self.terminal.draw(|f| {
            let size = Rect::new(0, 0, 2 + resolution.0 as u16, 2 + resolution.1 as u16);
            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(resolution.x_bounds())
                .y_bounds(resolution.y_bounds())
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &coords,
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }
}

/// useful for headless runs and testing non-display routines
pub struct DummyDisplay {
    pub frames: usize,
}

impl DummyDisplay {
    pub fn new() -> Self {
        DummyDisplay { frames: 0 }
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, _pixels: &[bool]) -> Result<(), io::Error> {
        self.frames += 1;
        Ok(())
    }
}
