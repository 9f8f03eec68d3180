use image::Rgba;
use image::RgbaImage;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::problem::Problem;
use crate::problems::maze_2d::Maze2DAction;
use crate::problems::maze_2d::Maze2DProblem;
use crate::problems::maze_2d::Maze2DState;
use crate::render::text::Glyph;
use crate::render::text::glyph;
use crate::render::text::solution_cells;
use crate::space::Solution;

const BACKGROUND: [u8; 4] = [u8::MIN, u8::MIN, u8::MIN, u8::MAX];
const WALL: [u8; 4] = [40, 40, 40, u8::MAX];
const START: [u8; 4] = [255, 0, 0, u8::MAX];
const GOAL: [u8; 4] = [0, 171, 28, u8::MAX];
const SOLUTION: [u8; 4] = [220, 235, 113, u8::MAX];
const EXPLORED: [u8; 4] = [212, 97, 85, u8::MAX];
const EMPTY: [u8; 4] = [237, 240, 252, u8::MAX];

#[derive(Debug, Error)]
pub enum ImageRenderError {
    #[error("a {cell_border}px border leaves nothing of a {cell_size}px cell")]
    CellGeometry { cell_size: u32, cell_border: u32 },
    #[error("a {width}x{height} maze with {cell_size}px cells does not fit in an image")]
    TooLarge {
        width: usize,
        height: usize,
        cell_size: u32,
    },
    #[error("Image error when saving '{p}': {e}")]
    ImageError {
        p: std::path::PathBuf,
        e: image::ImageError,
    },
}

/// Draws a maze as one coloured square per cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ImageRenderer {
    /// Side of each cell, in pixels.
    pub cell_size: u32,
    /// Background pixels left around each cell.
    pub cell_border: u32,
    pub show_solution: bool,
    /// Only honoured when a solution is given.
    pub show_explored: bool,
}

impl Default for ImageRenderer {
    fn default() -> Self {
        Self {
            cell_size: 50,
            cell_border: 2,
            show_solution: true,
            show_explored: false,
        }
    }
}

impl ImageRenderer {
    /// Side of `cells` cells, in pixels.
    fn pixels(&self, cells: usize) -> Option<u32> {
        u32::try_from(cells).ok()?.checked_mul(self.cell_size)
    }

    pub fn render(
        &self,
        problem: &Maze2DProblem,
        solution: Option<&Solution<Maze2DState, Maze2DAction>>,
        explored: Option<&FxHashSet<Maze2DState>>,
    ) -> Result<RgbaImage, ImageRenderError> {
        if self
            .cell_border
            .checked_mul(2)
            .is_none_or(|borders| borders >= self.cell_size)
        {
            return Err(ImageRenderError::CellGeometry {
                cell_size: self.cell_size,
                cell_border: self.cell_border,
            });
        }

        let space = problem.space();
        let (width, height) = space.dimensions();
        let (Some(width_px), Some(height_px)) = (self.pixels(width), self.pixels(height)) else {
            return Err(ImageRenderError::TooLarge {
                width,
                height,
                cell_size: self.cell_size,
            });
        };

        let path = solution.filter(|_| self.show_solution).map(solution_cells);
        let shown_explored = explored.filter(|_| self.show_explored && solution.is_some());

        // Row-major, one colour per cell.
        let fills: Vec<Rgba<u8>> = space
            .cells()
            .map(|(s, cell)| {
                Rgba(match glyph(problem, &s, cell, path.as_ref(), shown_explored) {
                    Glyph::Wall => WALL,
                    Glyph::Start => START,
                    Glyph::Goal => GOAL,
                    Glyph::Solution => SOLUTION,
                    Glyph::Explored => EXPLORED,
                    Glyph::Empty => EMPTY,
                })
            })
            .collect();

        let inner = self.cell_border..self.cell_size - self.cell_border;
        let mut img = RgbaImage::from_pixel(width_px, height_px, Rgba(BACKGROUND));
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            if inner.contains(&(x % self.cell_size)) && inner.contains(&(y % self.cell_size)) {
                let row = (y / self.cell_size) as usize;
                let col = (x / self.cell_size) as usize;
                *pixel = fills[row * width + col];
            }
        }

        Ok(img)
    }

    /// Renders and writes the image, the format is picked from the extension.
    pub fn save(
        &self,
        p: &std::path::Path,
        problem: &Maze2DProblem,
        solution: Option<&Solution<Maze2DState, Maze2DAction>>,
        explored: Option<&FxHashSet<Maze2DState>>,
    ) -> Result<(), ImageRenderError> {
        self.render(problem, solution, explored)?
            .save(p)
            .map_err(|e| ImageRenderError::ImageError {
                p: p.to_path_buf(),
                e,
            })?;
        log::debug!("Saved {:?} to {:?}", problem.space(), p);

        Ok(())
    }
}
