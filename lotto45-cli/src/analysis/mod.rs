pub mod sampler;
pub mod weights;

use lotto45_db::models::{Draw, NumberProbability, NumberStats, POOL_SIZE, ProbabilityTag};

/// Fréquences d'apparition par numéro sur la fenêtre demandée.
///
/// `draws[0]` = tirage le plus récent. `recent_k == 0` couvre tout
/// l'historique ; sinon seuls les `recent_k` tirages les plus récents
/// comptent. Les numéros hors 1-45 sont ignorés.
pub fn frequency_counts(draws: &[Draw], recent_k: usize) -> [u32; POOL_SIZE] {
    let window = if recent_k > 0 && recent_k < draws.len() {
        &draws[..recent_k]
    } else {
        draws
    };

    let mut counts = [0u32; POOL_SIZE];
    for draw in window {
        for &n in &draw.numbers {
            if n >= 1 && n as usize <= POOL_SIZE {
                counts[(n - 1) as usize] += 1;
            }
        }
    }
    counts
}

/// Fréquence et retard (tirages écoulés depuis la dernière apparition)
/// par numéro. `draws[0]` = tirage le plus récent.
pub fn compute_stats(draws: &[Draw]) -> Vec<NumberStats> {
    let mut stats: Vec<NumberStats> = (1..=POOL_SIZE as u8)
        .map(|n| NumberStats {
            number: n,
            frequency: 0,
            gap: 0,
        })
        .collect();

    for (i, draw) in draws.iter().enumerate() {
        for &n in &draw.numbers {
            let idx = (n - 1) as usize;
            if idx < stats.len() {
                stats[idx].frequency += 1;
                if stats[idx].gap == 0 {
                    stats[idx].gap = i as u32;
                }
            }
        }
    }

    for stat in &mut stats {
        if stat.frequency == 0 {
            stat.gap = draws.len() as u32;
        }
    }

    stats
}

pub fn number_probabilities(probs: &[f64; POOL_SIZE]) -> Vec<NumberProbability> {
    probs
        .iter()
        .enumerate()
        .map(|(i, &p)| NumberProbability {
            number: (i + 1) as u8,
            probability: p,
            tag: ProbabilityTag::Normal,
        })
        .collect()
}

pub fn tag_probabilities(probs: &mut [NumberProbability]) {
    let uniform = 1.0 / POOL_SIZE as f64;
    let threshold = 0.3;

    for p in probs.iter_mut() {
        let deviation = (p.probability - uniform) / uniform;
        if deviation > threshold {
            p.tag = ProbabilityTag::Hot;
        } else if deviation < -threshold {
            p.tag = ProbabilityTag::Cold;
        } else {
            p.tag = ProbabilityTag::Normal;
        }
    }
}
