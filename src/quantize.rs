//! Dominant color extraction.
//!
//! The source is resampled to a fixed [`SAMPLE_SIZE`]² grid and clustered
//! with k-means in plain sRGB. Clusters are ranked by how many sample
//! pixels they own, so the first palette entry is the most common color.

use std::collections::BTreeMap;

use image::{RgbImage, imageops::{self, FilterType}};
use kmeans_colors::get_kmeans;
use palette::Srgb;
use tracing::debug;

use crate::color::{Color, quantize_channels, to_hex};
use crate::error::{CardError, Result};

/// Side length of the square sample grid that gets clustered.
pub const SAMPLE_SIZE: u32 = 200;
/// Seed used when the caller does not supply one.
pub const DEFAULT_SEED: u64 = 42;
/// Palette sizes the compositor has a grid for.
pub const SUPPORTED_COUNTS: [usize; 3] = [5, 8, 10];

const WIDE_CLUSTERS: usize = 10;
const WIDE_PICKS: [usize; 5] = [0, 2, 4, 7, 9];

const MAX_ITERATIONS: usize = 300;
const CONVERGENCE: f32 = 0.0025;
const KMEANS_RUNS: u64 = 3;

/// How the five-swatch palette is drawn from the clustering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Sampling {
    /// Cluster into exactly as many colors as requested.
    #[default]
    Narrow,
    /// Cluster into ten colors and keep a spread of ranks
    /// (0, 2, 4, 7, 9) instead of the top five. Only affects a count of 5.
    Wide,
}

/// One palette entry together with the number of sample pixels its cluster owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Swatch {
    pub color: Color,
    pub population: u32,
}

/// Colors ordered by descending cluster population.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    swatches: Vec<Swatch>,
}

impl Palette {
    /// Wrap colors that are already in display order, e.g. a palette the
    /// caller stored from an earlier request. Populations are left at zero.
    pub fn from_colors(colors: impl IntoIterator<Item = Color>) -> Self {
        let swatches = colors.into_iter().map(|color| Swatch { color, population: 0 }).collect();
        Self { swatches }
    }

    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.swatches.iter().map(|s| s.color)
    }

    pub fn get(&self, index: usize) -> Option<Color> {
        self.swatches.get(index).map(|s| s.color)
    }

    pub fn len(&self) -> usize {
        self.swatches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }

    /// Uppercase `RRGGBB` strings in palette order.
    pub fn hex(&self) -> Vec<String> {
        self.colors().map(to_hex).collect()
    }
}

/// Reject anything the compositor has no grid for.
pub fn validate_count(count: usize) -> Result<()> {
    if SUPPORTED_COUNTS.contains(&count) {
        Ok(())
    } else {
        Err(CardError::InvalidColorCount(count))
    }
}

/// Extract `count` representative colors from `img`.
///
/// The result depends only on the pixel data, `count`, `sampling` and
/// `seed`: the same inputs always give the same palette.
pub fn extract_colors(img: &RgbImage, count: usize, sampling: Sampling, seed: u64) -> Result<Palette> {
    validate_count(count)?;
    if img.width() == 0 || img.height() == 0 {
        return Err(CardError::DegenerateImage { width: img.width(), height: img.height() });
    }

    let wide = sampling == Sampling::Wide && count == WIDE_PICKS.len();
    let k = if wide { WIDE_CLUSTERS } else { count };

    let sample = sample_grid(img);
    let ranked = rank_clusters(cluster(&sample, k, seed));

    let swatches = if wide {
        WIDE_PICKS.iter().map(|&i| ranked[i]).collect()
    } else {
        ranked
    };

    let palette = Palette { swatches };
    debug!(k, wide, palette = ?palette.hex(), "extracted palette");
    Ok(palette)
}

fn sample_grid(img: &RgbImage) -> RgbImage {
    // Fast path – already at sample resolution.
    if img.dimensions() == (SAMPLE_SIZE, SAMPLE_SIZE) {
        return img.clone();
    }
    imageops::resize(img, SAMPLE_SIZE, SAMPLE_SIZE, FilterType::CatmullRom)
}

/// Cluster centroid plus member count, before ranking.
struct Cluster {
    centroid: Color,
    population: u32,
}

fn cluster(sample: &RgbImage, k: usize, seed: u64) -> Vec<Cluster> {
    let mut histogram: BTreeMap<[u8; 3], u32> = BTreeMap::new();
    for p in sample.pixels() {
        *histogram.entry(p.0).or_insert(0) += 1;
    }

    // Too few distinct colors for k-means to seed k centers: every distinct
    // color is its own cluster, the rest stay empty.
    if histogram.len() <= k {
        debug!(distinct = histogram.len(), k, "skipping k-means on low-color sample");
        let mut clusters: Vec<Cluster> = histogram
            .iter()
            .map(|(rgb, &population)| Cluster { centroid: Srgb::new(rgb[0], rgb[1], rgb[2]), population })
            .collect();
        let filler = clusters
            .iter()
            .max_by_key(|c| c.population)
            .map(|c| c.centroid)
            .unwrap_or_default();
        clusters.resize_with(k, || Cluster { centroid: filler, population: 0 });
        return clusters;
    }

    let pixels: Vec<Srgb<f32>> = sample
        .pixels()
        .map(|p| Srgb::new(p[0], p[1], p[2]).into_format::<f32>())
        .collect();

    // Lowest score over several seeded restarts.
    let run = |i: u64| get_kmeans(k, MAX_ITERATIONS, CONVERGENCE, false, &pixels, seed.wrapping_add(i));
    let kmeans = (1..KMEANS_RUNS).map(run).fold(run(0), |best, next| {
        if next.score < best.score { next } else { best }
    });
    debug!(k, score = kmeans.score, "k-means converged");

    let mut populations = vec![0u32; kmeans.centroids.len()];
    for &idx in &kmeans.indices {
        populations[idx as usize] += 1;
    }

    kmeans
        .centroids
        .iter()
        .zip(populations)
        .map(|(&c, population)| Cluster { centroid: quantize_channels(c), population })
        .collect()
}

/// Descending population; equal populations fall back to the centroid's
/// RGB value, then to cluster index, so ties never depend on the engine.
fn rank_clusters(clusters: Vec<Cluster>) -> Vec<Swatch> {
    let mut order: Vec<usize> = (0..clusters.len()).collect();
    order.sort_by(|&a, &b| {
        let (ca, cb) = (&clusters[a], &clusters[b]);
        cb.population
            .cmp(&ca.population)
            .then_with(|| rgb_key(ca.centroid).cmp(&rgb_key(cb.centroid)))
            .then_with(|| a.cmp(&b))
    });
    order
        .into_iter()
        .map(|i| Swatch { color: clusters[i].centroid, population: clusters[i].population })
        .collect()
}

fn rgb_key(c: Color) -> (u8, u8, u8) {
    (c.red, c.green, c.blue)
}
