use std::collections::HashSet;

use crate::video::VideoCandidate;

const PROMO_TOKENS: [&str; 2] = ["teaser", "trailer"];

/// Exclusion counts from one [`filter`] pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterStats {
    pub shorts: usize,
    pub teasers: usize,
}

impl FilterStats {
    pub fn excluded(&self) -> usize {
        self.shorts + self.teasers
    }
}

pub fn is_short(video_id: &str, shorts: &HashSet<String>) -> bool {
    shorts.contains(video_id)
}

pub fn is_teaser_or_trailer(title: &str) -> bool {
    let title = title.to_lowercase();
    PROMO_TOKENS.iter().any(|token| title.contains(token))
}

/// Drops short-form videos and teasers/trailers, keeping the original order.
/// A video that is both a short and a trailer counts as a short.
pub fn filter(
    candidates: Vec<VideoCandidate>,
    shorts: &HashSet<String>,
) -> (Vec<VideoCandidate>, FilterStats) {
    let mut stats = FilterStats::default();
    let kept = candidates
        .into_iter()
        .filter(|video| {
            if is_short(&video.id, shorts) {
                stats.shorts += 1;
                false
            } else if is_teaser_or_trailer(&video.title) {
                stats.teasers += 1;
                false
            } else {
                true
            }
        })
        .collect();
    (kept, stats)
}
