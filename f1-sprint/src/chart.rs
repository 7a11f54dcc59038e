//! PNG chart reporter.
//!
//! Draws the two charts on an [`RgbImage`]: horizontal bars of sprint wins
//! per driver, and a marked line of sprint races per season. Titles, axis
//! labels and tick labels are set in DejaVu Sans, which is compiled into the
//! binary. Both images are rendered in memory before either file is written.

use std::path::{Path, PathBuf};

use ab_glyph::{FontRef, PxScale};
use f1_sprint_core::contract::{ReportError, Reporter};
use f1_sprint_core::model::{SprintWinSummary, YearCount};
use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};

pub const WINS_BY_DRIVER_FILE: &str = "sprint_wins_by_driver.png";
pub const RACES_BY_YEAR_FILE: &str = "sprint_races_by_year.png";

pub const WINS_BY_DRIVER_TITLE: &str = "F1 Sprint Race Wins by Driver";
pub const RACES_BY_YEAR_TITLE: &str = "F1 Sprint Races by Year";

const FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([226, 226, 232]);
const AXIS: Rgb<u8> = Rgb([60, 60, 60]);
const TEXT: Rgb<u8> = Rgb([30, 30, 30]);
const LINE: Rgb<u8> = Rgb([49, 115, 161]);
const PALETTE: &[Rgb<u8>] = &[
    Rgb([76, 114, 176]),
    Rgb([221, 132, 82]),
    Rgb([85, 168, 104]),
    Rgb([196, 78, 82]),
    Rgb([129, 114, 179]),
    Rgb([147, 120, 96]),
    Rgb([218, 139, 195]),
    Rgb([140, 140, 140]),
    Rgb([204, 185, 116]),
    Rgb([100, 181, 205]),
];

/// Plot area inside the image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotArea {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl PlotArea {
    fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    fn centre(&self) -> (i64, i64) {
        (
            i64::from(self.left) + i64::from(self.width() / 2),
            i64::from(self.top) + i64::from(self.height() / 2),
        )
    }
}

/// The font at the three sizes a chart uses, scaled to the image height.
struct Typeface {
    font: FontRef<'static>,
    title: PxScale,
    label: PxScale,
    tick: PxScale,
    pad: u32,
}

impl Typeface {
    fn load(height: u32) -> Result<Self, ReportError> {
        let font = FontRef::try_from_slice(FONT)?;
        let px = |divisor: u32| PxScale::from((height / divisor).max(8) as f32);
        Ok(Self {
            font,
            title: px(28),
            label: px(36),
            tick: px(50),
            pad: (height / 40).max(2),
        })
    }

    fn width_of(&self, scale: PxScale, text: &str) -> u32 {
        text_size(scale, &self.font, text).0
    }

    fn line_height(&self, scale: PxScale) -> u32 {
        (scale.y * 1.2).ceil() as u32
    }

    fn draw(&self, img: &mut RgbImage, scale: PxScale, x: i64, top: i64, text: &str) {
        draw_text_mut(img, TEXT, to_i32(x), to_i32(top), scale, &self.font, text);
    }

    /// Horizontally centred on `cx`.
    fn centred(&self, img: &mut RgbImage, scale: PxScale, cx: i64, top: i64, text: &str) {
        let width = i64::from(self.width_of(scale, text));
        self.draw(img, scale, cx - width / 2, top, text);
    }

    /// Ends at `right`, vertically centred on `cy`.
    fn right_aligned(&self, img: &mut RgbImage, scale: PxScale, right: i64, cy: i64, text: &str) {
        let width = i64::from(self.width_of(scale, text));
        let height = i64::from(self.line_height(scale));
        self.draw(img, scale, right - width, cy - height / 2, text);
    }

    /// Reads bottom to top, centred on (`cx`, `cy`).
    fn vertical(&self, img: &mut RgbImage, scale: PxScale, cx: i64, cy: i64, text: &str) {
        let width = self.width_of(scale, text) + 2;
        let height = self.line_height(scale);
        let mut strip = RgbImage::from_pixel(width, height, BACKGROUND);
        draw_text_mut(&mut strip, TEXT, 1, 0, scale, &self.font, text);
        let turned = imageops::rotate270(&strip);
        let x = cx - i64::from(turned.width()) / 2;
        let y = cy - i64::from(turned.height()) / 2;
        imageops::overlay(img, &turned, x, y);
    }
}

#[derive(Debug, Clone)]
pub struct PngChartReporter {
    width: u32,
    height: u32,
}

impl Default for PngChartReporter {
    fn default() -> Self {
        Self::new(1200, 800)
    }
}

impl PngChartReporter {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(64),
            height: height.max(64),
        }
    }

    /// Leaves room for the title above and for tick labels plus the axis
    /// label below. `gutter` is the space wanted left of the plot.
    fn frame(&self, face: &Typeface, gutter: u32) -> PlotArea {
        let pad = face.pad;
        let top = face.line_height(face.title) + 2 * pad;
        let below = face.line_height(face.tick) + face.line_height(face.label) + 3 * pad;
        let left = gutter.clamp(self.width / 10, self.width / 2).max(1);
        PlotArea {
            left,
            top,
            right: self
                .width
                .saturating_sub(self.width / 24 + 1)
                .max(left + 1),
            bottom: self.height.saturating_sub(below).max(top + 1),
        }
    }

    /// Gutter for a vertical axis label plus right-aligned tick labels.
    fn gutter<'a>(face: &Typeface, labels: impl Iterator<Item = &'a str>) -> u32 {
        let widest = labels
            .map(|label| face.width_of(face.tick, label))
            .max()
            .unwrap_or(0);
        widest + face.line_height(face.label) + 4 * face.pad
    }

    fn wins_by_driver_frame(&self, face: &Typeface, summary: &[SprintWinSummary]) -> PlotArea {
        let names = summary.iter().map(|row| row.driver_name.as_str());
        self.frame(face, Self::gutter(face, names))
    }

    fn races_by_year_frame(&self, face: &Typeface, wins_by_year: &[YearCount]) -> PlotArea {
        let max_count = max_or_one(wins_by_year.iter().map(|y| y.count));
        let labels: Vec<String> = ticks(max_count).map(|tick| tick.to_string()).collect();
        self.frame(face, Self::gutter(face, labels.iter().map(String::as_str)))
    }

    /// Where the bars of [`Self::render_wins_by_driver`] go for this summary.
    pub fn wins_by_driver_area(
        &self,
        summary: &[SprintWinSummary],
    ) -> Result<PlotArea, ReportError> {
        let face = Typeface::load(self.height)?;
        Ok(self.wins_by_driver_frame(&face, summary))
    }

    /// Where the line of [`Self::render_wins_by_year`] goes for these seasons.
    pub fn races_by_year_area(
        &self,
        wins_by_year: &[YearCount],
    ) -> Result<PlotArea, ReportError> {
        let face = Typeface::load(self.height)?;
        Ok(self.races_by_year_frame(&face, wins_by_year))
    }

    fn decorate(
        &self,
        img: &mut RgbImage,
        face: &Typeface,
        area: PlotArea,
        title: &str,
        x_label: &str,
        y_label: &str,
    ) {
        let (cx, cy) = area.centre();
        let pad = i64::from(face.pad);
        face.centred(img, face.title, i64::from(self.width / 2), pad, title);
        let x_label_top =
            i64::from(area.bottom) + 2 * pad + i64::from(face.line_height(face.tick));
        face.centred(img, face.label, cx, x_label_top, x_label);
        let y_label_x = pad + i64::from(face.line_height(face.label)) / 2;
        face.vertical(img, face.label, y_label_x, cy, y_label);
        draw_axes(img, area);
    }

    /// One horizontal bar per driver, top to bottom in summary order, each
    /// labelled with the driver's name.
    pub fn render_wins_by_driver(
        &self,
        summary: &[SprintWinSummary],
    ) -> Result<RgbImage, ReportError> {
        let face = Typeface::load(self.height)?;
        let area = self.wins_by_driver_frame(&face, summary);
        let mut img = RgbImage::from_pixel(self.width, self.height, BACKGROUND);
        let max_wins = max_or_one(summary.iter().map(|row| row.sprint_wins));
        let pad = i64::from(face.pad);

        for tick in ticks(max_wins) {
            let x = area.left + scale(tick, max_wins, area.width());
            fill_rect(&mut img, x, area.top, x + 1, area.bottom, GRID);
            let label_top = i64::from(area.bottom) + pad;
            face.centred(&mut img, face.tick, i64::from(x), label_top, &tick.to_string());
        }

        if !summary.is_empty() {
            let slot = area.height() / summary.len() as u32;
            let inset = slot / 8;
            for (i, row) in summary.iter().enumerate() {
                let y0 = area.top + slot * i as u32 + inset;
                let y1 = (area.top + slot * (i as u32 + 1))
                    .saturating_sub(inset)
                    .max(y0 + 1);
                let x1 = area.left + scale(row.sprint_wins, max_wins, area.width());
                fill_rect(&mut img, area.left, y0, x1, y1, PALETTE[i % PALETTE.len()]);
                let cy = i64::from(area.top + slot * i as u32 + slot / 2);
                let right = i64::from(area.left) - pad;
                face.right_aligned(&mut img, face.tick, right, cy, &row.driver_name);
            }
        }

        self.decorate(
            &mut img,
            &face,
            area,
            WINS_BY_DRIVER_TITLE,
            "Number of Sprint Wins",
            "Driver",
        );
        Ok(img)
    }

    /// Sprint races per season as a line with a marker and a tick label per season.
    pub fn render_wins_by_year(
        &self,
        wins_by_year: &[YearCount],
    ) -> Result<RgbImage, ReportError> {
        let face = Typeface::load(self.height)?;
        let area = self.races_by_year_frame(&face, wins_by_year);
        let mut img = RgbImage::from_pixel(self.width, self.height, BACKGROUND);
        let max_count = max_or_one(wins_by_year.iter().map(|y| y.count));
        let pad = i64::from(face.pad);

        for tick in ticks(max_count) {
            let y = area.bottom - scale(tick, max_count, area.height());
            fill_rect(&mut img, area.left, y, area.right, y + 1, GRID);
            let right = i64::from(area.left) - pad;
            face.right_aligned(&mut img, face.tick, right, i64::from(y), &tick.to_string());
        }

        let points: Vec<(i64, i64)> = match (wins_by_year.first(), wins_by_year.last()) {
            (Some(first), Some(last)) => {
                let first_year = i64::from(first.year);
                let span = i64::from(last.year) - first_year;
                let inset = area.width() / 20;
                wins_by_year
                    .iter()
                    .map(|entry| {
                        let x = if span == 0 {
                            area.left + area.width() / 2
                        } else {
                            let offset = i64::from(entry.year) - first_year;
                            area.left + inset + scale(offset, span, area.width() - 2 * inset)
                        };
                        let y = area.bottom - scale(entry.count, max_count, area.height());
                        (i64::from(x), i64::from(y))
                    })
                    .collect()
            }
            _ => Vec::new(),
        };

        for pair in points.windows(2) {
            draw_line(&mut img, pair[0], pair[1], 2, LINE);
        }
        let label_top = i64::from(area.bottom) + pad;
        for (&(x, y), entry) in points.iter().zip(wins_by_year) {
            draw_disc(&mut img, x, y, 6, LINE);
            face.centred(&mut img, face.tick, x, label_top, &entry.year.to_string());
        }

        self.decorate(
            &mut img,
            &face,
            area,
            RACES_BY_YEAR_TITLE,
            "Year",
            "Number of Sprint Races",
        );
        Ok(img)
    }
}

impl Reporter for PngChartReporter {
    fn render(
        &self,
        summary: &[SprintWinSummary],
        wins_by_year: &[YearCount],
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, ReportError> {
        tracing::info!(drivers = summary.len(), seasons = wins_by_year.len(), "Rendering charts");
        let charts = [
            (WINS_BY_DRIVER_FILE, self.render_wins_by_driver(summary)?),
            (RACES_BY_YEAR_FILE, self.render_wins_by_year(wins_by_year)?),
        ];

        std::fs::create_dir_all(output_dir)?;
        let mut written = Vec::with_capacity(charts.len());
        for (file, img) in charts {
            let path = output_dir.join(file);
            if let Err(e) = img.save(&path) {
                tracing::error!(error = ?e, path = %path.display(), "Failed to save chart");
                for done in &written {
                    let _ = std::fs::remove_file(done);
                }
                return Err(e.into());
            }
            tracing::info!(path = %path.display(), "Saved plot");
            written.push(path);
        }
        Ok(written)
    }
}

fn to_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

fn max_or_one(values: impl Iterator<Item = i64>) -> i64 {
    values.max().unwrap_or(0).max(1)
}

fn ticks(max: i64) -> impl Iterator<Item = i64> {
    let step = if max <= 20 { 1 } else { (max + 9) / 10 };
    (0..=max).step_by(step as usize)
}

fn scale(value: i64, max: i64, extent: u32) -> u32 {
    if max <= 0 {
        return 0;
    }
    ((value.clamp(0, max) as f64 / max as f64) * f64::from(extent)).round() as u32
}

fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    let x1 = x1.min(img.width());
    let y1 = y1.min(img.height());
    for y in y0..y1 {
        for x in x0..x1 {
            img.put_pixel(x, y, color);
        }
    }
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && x < i64::from(img.width()) && y < i64::from(img.height()) {
        img.put_pixel(x as u32, y as u32, color);
    }
}

fn draw_disc(img: &mut RgbImage, cx: i64, cy: i64, radius: i64, color: Rgb<u8>) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                put(img, cx + dx, cy + dy, color);
            }
        }
    }
}

// Bresenham, stamping a square brush of half-width `thickness`.
fn draw_line(img: &mut RgbImage, from: (i64, i64), to: (i64, i64), thickness: i64, color: Rgb<u8>) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        for oy in -thickness..=thickness {
            for ox in -thickness..=thickness {
                put(img, x + ox, y + oy, color);
            }
        }
        if x == to.0 && y == to.1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn draw_axes(img: &mut RgbImage, area: PlotArea) {
    let left = area.left.saturating_sub(2);
    fill_rect(img, left, area.top, area.left, area.bottom + 2, AXIS);
    fill_rect(img, left, area.bottom, area.right, area.bottom + 2, AXIS);
}
