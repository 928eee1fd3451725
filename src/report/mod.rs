//! Ranking computation and the human-readable summary.
//!
//! Kept separate from the channel-draining stage so the sort / tie-break /
//! rating logic is a pure function over a collection of `CityStat`s.

use crate::domain::CityStat;

/// The ranked collection plus the best-cities set.
#[derive(Debug, Clone, PartialEq)]
pub struct Rankings {
    /// All cities, sorted by favorability, with `rating` attached and the
    /// day-level detail dropped.
    pub ranked: Vec<CityStat>,
    /// Every city sharing the rank-1 (rainless, temperature) pair.
    pub best: Vec<String>,
}

/// Sort by favorability and assign tie-aware ratings.
///
/// The order is descending on the exact rounded pair (average rainless
/// hours, average temperature). Cities with equal pairs share a rating and
/// the next distinct pair resumes at its 1-based position, so two tied
/// leaders are both rating 1 and the runner-up is rating 3.
pub fn rank_cities(mut stats: Vec<CityStat>) -> Rankings {
    stats.sort_by(|a, b| {
        let (a_rainless, a_temp) = a.score();
        let (b_rainless, b_temp) = b.score();
        b_rainless
            .total_cmp(&a_rainless)
            .then_with(|| b_temp.total_cmp(&a_temp))
    });

    let mut best: Vec<String> = Vec::new();
    let mut previous: Option<((f64, f64), u32)> = None;

    for (index, stat) in stats.iter_mut().enumerate() {
        let score = stat.score();
        let rating = match previous {
            Some((prev_score, prev_rating)) if prev_score == score => prev_rating,
            _ => index as u32 + 1,
        };
        stat.rating = Some(rating);
        stat.days.clear();
        previous = Some((score, rating));

        if rating == 1 {
            best.push(stat.city.clone());
        }
    }

    Rankings {
        ranked: stats,
        best,
    }
}

/// One line naming the member(s) of the best-cities set.
pub fn format_summary(best: &[String]) -> String {
    match best {
        [] => "No city qualified for the rating.".to_string(),
        [city] => format!(
            "The most favorable city, with the most rainless daytime hours \
             and the highest average temperature: {city}"
        ),
        many => format!(
            "The most favorable cities, tied on rainless daytime hours \
             and average temperature: {}",
            many.join(", ")
        ),
    }
}
