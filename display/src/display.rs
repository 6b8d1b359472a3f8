use color_eyre::eyre::{eyre, Result, WrapErr};
use sdl2::pixels::PixelFormatEnum;

use chip8le_core::{FrameBuffer, Renderer};

/// # Display
/// Presents a monochrome FrameBuffer in an SDL2 window, each pixel blown up to a `scale` x `scale`
/// square. Lit pixels are white, unlit pixels black.
pub struct Display {
    canvas: sdl2::render::WindowCanvas,
    width: usize,
    height: usize,
}

impl Display {
    /// Creates a new display object bound to an sdl2 context.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context with which to draw
    /// * `width` the horizontal size of the display measured in pixels
    /// * `height` the vertical size of the display measured in pixels
    /// * `scale` the size multiplier for each pixel
    pub fn new(sdl: &sdl2::Sdl, width: usize, height: usize, scale: u32) -> Result<Self> {
        let video_subsystem = sdl
            .video()
            .map_err(|e| eyre!(e))
            .wrap_err("failed to initialise the SDL2 video subsystem")?;
        let window = video_subsystem
            .window(
                "Chip8le",
                width as u32 * scale,
                height as u32 * scale,
            )
            .position_centered()
            .opengl()
            .build()
            .wrap_err("failed to open a window")?;
        let canvas = window
            .into_canvas()
            .build()
            .wrap_err("failed to create a canvas")?;

        Ok(Display {
            canvas,
            width,
            height,
        })
    }

    /// Formats a FrameBuffer for rendering as an SDL2 texture.
    ///
    /// An SDL2 texture is a 1D array of ints that represent concatenated rows of RGB pixels.
    ///
    /// This creates a black and white rendering by:
    /// - Flattening the 2D frame buffer into a 1D array by concatenating its rows
    /// - Triplicating each element of that 1D array to represent the RGB values of each pixel
    /// - Mapping lit pixels to 255 and unlit ones to 0
    ///
    /// # Arguments
    /// * `frame` a FrameBuffer
    fn frame_to_sdl_texture(frame: &FrameBuffer) -> Vec<u8> {
        frame
            .rows()
            .flat_map(|row| row.iter())
            .flat_map(|lit| std::iter::repeat(if *lit { 255 } else { 0 }).take(3))
            .collect()
    }
}

impl Renderer for Display {
    type Error = color_eyre::Report;

    /// Formats the FrameBuffer as an SDL2 RGB24 texture and renders it.
    fn render(&mut self, frame: &FrameBuffer) -> Result<()> {
        if frame.width() != self.width || frame.height() != self.height {
            return Err(eyre!(
                "cannot present a {}x{} frame on a {}x{} display",
                frame.width(),
                frame.height(),
                self.width,
                self.height
            ));
        }

        let texture_creator = self.canvas.texture_creator();
        let mut texture = texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                self.width as u32,
                self.height as u32,
            )
            .wrap_err("failed to create a texture")?;

        let pixels = Display::frame_to_sdl_texture(frame);
        let row_bytes = self.width * 3;
        texture
            .with_lock(None, |buffer: &mut [u8], pitch: usize| {
                // rows may be padded out to `pitch` bytes
                for (row, source) in pixels.chunks(row_bytes).enumerate() {
                    let start = row * pitch;
                    buffer[start..start + row_bytes].copy_from_slice(source);
                }
            })
            .map_err(|e| eyre!(e))?;

        self.canvas.copy(&texture, None, None).map_err(|e| eyre!(e))?;
        self.canvas.present();
        Ok(())
    }
}
