use std::collections::HashSet;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use lotto45_db::models::{PICK_COUNT, POOL_SIZE, Suggestion};

/// Nombre maximal de retirages avant d'abandonner l'exclusion des
/// combinaisons déjà présentes dans l'historique.
pub const MAX_DEDUP_ATTEMPTS: usize = 5000;

/// Tirage pondéré sans remise : `k` numéros distincts pris dans `numbers`
/// proportionnellement à `probs`, retournés triés, avec le rapport de
/// vraisemblance de la grille face au tirage uniforme.
///
/// À chaque pas la masse restante est renormalisée sur le pool réduit ; le
/// premier candidat dont la masse cumulée atteint le tirage uniforme `r`
/// est retenu (le dernier restant si l'arrondi flottant laisse la masse
/// sous `r`). Si la masse restante n'est plus strictement positive, le pas
/// se replie sur un choix uniforme parmi les candidats restants.
/// L'appelant garantit `k <= numbers.len()`.
pub fn sample_without_replacement(
    numbers: &[u8],
    probs: &[f64],
    k: usize,
    rng: &mut StdRng,
) -> (Vec<u8>, f64) {
    let uniform = 1.0 / numbers.len() as f64;
    let mut available: Vec<u8> = numbers.to_vec();
    let mut weights: Vec<f64> = probs.to_vec();
    let mut chosen = Vec::with_capacity(k);
    let mut score = 1.0f64;

    for _ in 0..k {
        let s: f64 = weights.iter().sum();
        let (idx, share) = if s <= 0.0 || s.is_nan() {
            let idx = rng.random_range(0..available.len());
            (idx, 1.0 / available.len() as f64)
        } else {
            let r: f64 = rng.random();
            let mut acc = 0.0;
            let mut idx = available.len() - 1;
            for (i, &w) in weights.iter().enumerate() {
                acc += w / s;
                if r <= acc {
                    idx = i;
                    break;
                }
            }
            (idx, weights[idx])
        };

        chosen.push(available.remove(idx));
        weights.remove(idx);
        score *= share / uniform;
    }

    chosen.sort();
    (chosen, score)
}

fn draw_grid(numbers: &[u8], probs: &[f64], rng: &mut StdRng) -> Suggestion {
    let (picks, score) = sample_without_replacement(numbers, probs, PICK_COUNT, rng);
    let mut grid = [0u8; 6];
    grid.copy_from_slice(&picks);
    Suggestion { numbers: grid, score }
}

/// Tire une grille en rejetant, jusqu'à `attempts` essais, celles qui
/// reproduisent exactement une combinaison de `existing`. L'épuisement des
/// essais n'est pas une erreur : la dernière grille tirée est rendue telle
/// quelle.
pub fn generate_unique(
    numbers: &[u8],
    probs: &[f64],
    existing: &HashSet<[u8; 6]>,
    exclude_exact: bool,
    attempts: usize,
    rng: &mut StdRng,
) -> Suggestion {
    let mut grid = draw_grid(numbers, probs, rng);
    if exclude_exact {
        let mut tries = 1;
        while tries < attempts && existing.contains(&grid.numbers) {
            grid = draw_grid(numbers, probs, rng);
            tries += 1;
        }
    }
    grid
}

/// Génère `count` grilles sur l'univers 1-45. Chaque grille est confrontée
/// à l'historique, jamais aux autres grilles du même lot. `seed` fige le
/// générateur pour la reproductibilité ; sans seed, l'aléa vient de l'OS.
pub fn generate_suggestions(
    probs: &[f64; POOL_SIZE],
    count: usize,
    existing: &HashSet<[u8; 6]>,
    exclude_exact: bool,
    seed: Option<u64>,
) -> Vec<Suggestion> {
    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let numbers: Vec<u8> = (1..=POOL_SIZE as u8).collect();

    let mut suggestions = Vec::with_capacity(count);
    for _ in 0..count {
        suggestions.push(generate_unique(
            &numbers,
            probs,
            existing,
            exclude_exact,
            MAX_DEDUP_ATTEMPTS,
            &mut rng,
        ));
    }
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_probs(n: usize) -> Vec<f64> {
        vec![1.0 / n as f64; n]
    }

    fn pool(n: u8) -> Vec<u8> {
        (1..=n).collect()
    }

    #[test]
    fn test_sample_returns_k_distinct_sorted() {
        let numbers = pool(45);
        let probs = uniform_probs(45);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let (picks, _) = sample_without_replacement(&numbers, &probs, 6, &mut rng);
            assert_eq!(picks.len(), 6);
            assert!(picks.windows(2).all(|w| w[0] < w[1]), "tri ou doublon : {:?}", picks);
            assert!(picks.iter().all(|n| (1..=45).contains(n)));
        }
    }

    #[test]
    fn test_sample_zero_weights_falls_back_to_uniform() {
        let numbers = pool(45);
        let probs = vec![0.0; 45];
        let mut rng = StdRng::seed_from_u64(42);

        let (picks, _) = sample_without_replacement(&numbers, &probs, 6, &mut rng);
        assert_eq!(picks.len(), 6);
        assert!(picks.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_sample_whole_pool() {
        let numbers = pool(6);
        let probs = uniform_probs(6);
        let mut rng = StdRng::seed_from_u64(42);

        let (picks, _) = sample_without_replacement(&numbers, &probs, 6, &mut rng);
        assert_eq!(picks, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_sample_bias_statistical() {
        // Le numéro 7 porte la moitié de la masse : il doit sortir bien
        // plus souvent que sous l'uniforme.
        let numbers = pool(45);
        let mut skewed = vec![0.5 / 44.0; 45];
        skewed[6] = 0.5;
        let uniform = uniform_probs(45);

        let mut rng = StdRng::seed_from_u64(42);
        let trials = 2000;

        let mut skewed_hits = 0;
        let mut uniform_hits = 0;
        for _ in 0..trials {
            let (picks, _) = sample_without_replacement(&numbers, &skewed, 6, &mut rng);
            if picks.contains(&7) {
                skewed_hits += 1;
            }
            let (picks, _) = sample_without_replacement(&numbers, &uniform, 6, &mut rng);
            if picks.contains(&7) {
                uniform_hits += 1;
            }
        }

        assert!(
            skewed_hits > uniform_hits,
            "biais absent : {skewed_hits} contre {uniform_hits} sur {trials} tirages"
        );
        assert!(skewed_hits > trials / 2, "biais trop faible : {skewed_hits}/{trials}");
    }

    #[test]
    fn test_score_uniform_is_one() {
        let numbers = pool(45);
        let probs = uniform_probs(45);
        let mut rng = StdRng::seed_from_u64(42);

        let (_, score) = sample_without_replacement(&numbers, &probs, 6, &mut rng);
        assert!((score - 1.0).abs() < 1e-9, "score = {score}");
    }

    #[test]
    fn test_score_is_likelihood_ratio() {
        // Pool entier tiré : le score vaut le produit des parts initiales
        // rapportées à l'uniforme, quel que soit l'ordre des choix.
        let numbers = pool(6);
        let probs = vec![0.5, 0.1, 0.1, 0.1, 0.1, 0.1];
        let mut rng = StdRng::seed_from_u64(42);

        let (picks, score) = sample_without_replacement(&numbers, &probs, 6, &mut rng);
        assert_eq!(picks, vec![1, 2, 3, 4, 5, 6]);
        let expected = (0.5 * 6.0) * (0.1f64 * 6.0).powi(5);
        assert!((score - expected).abs() < 1e-9, "score = {score}");
    }

    #[test]
    fn test_generate_unique_skips_existing() {
        // Pool de 7 numéros : 7 combinaisons possibles, une seule exclue.
        let numbers = pool(7);
        let probs = uniform_probs(7);
        let existing: HashSet<[u8; 6]> = HashSet::from([[1, 2, 3, 4, 5, 6]]);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..30 {
            let grid = generate_unique(&numbers, &probs, &existing, true, MAX_DEDUP_ATTEMPTS, &mut rng);
            assert_ne!(grid.numbers, [1, 2, 3, 4, 5, 6]);
        }
    }

    #[test]
    fn test_generate_unique_exhaustion_returns_last_attempt() {
        // Pool de 6 numéros : une seule combinaison possible, exclue.
        // L'épuisement des essais rend la grille quand même.
        let numbers = pool(6);
        let probs = uniform_probs(6);
        let existing: HashSet<[u8; 6]> = HashSet::from([[1, 2, 3, 4, 5, 6]]);
        let mut rng = StdRng::seed_from_u64(42);

        let grid = generate_unique(&numbers, &probs, &existing, true, 50, &mut rng);
        assert_eq!(grid.numbers, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_generate_unique_disabled_ignores_existing() {
        let numbers = pool(6);
        let probs = uniform_probs(6);
        let existing: HashSet<[u8; 6]> = HashSet::from([[1, 2, 3, 4, 5, 6]]);
        let mut rng = StdRng::seed_from_u64(42);

        let grid = generate_unique(&numbers, &probs, &existing, false, MAX_DEDUP_ATTEMPTS, &mut rng);
        assert_eq!(grid.numbers, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_generate_suggestions_count_and_validity() {
        let probs = [1.0 / POOL_SIZE as f64; POOL_SIZE];
        let existing = HashSet::new();

        let suggestions = generate_suggestions(&probs, 5, &existing, true, Some(42));
        assert_eq!(suggestions.len(), 5);
        for sug in &suggestions {
            assert!(sug.numbers.windows(2).all(|w| w[0] < w[1]));
            assert!(sug.numbers.iter().all(|n| (1..=45).contains(n)));
        }
    }

    #[test]
    fn test_generate_suggestions_seed_determinism() {
        let probs = [1.0 / POOL_SIZE as f64; POOL_SIZE];
        let existing = HashSet::new();

        let s1 = generate_suggestions(&probs, 5, &existing, true, Some(123));
        let s2 = generate_suggestions(&probs, 5, &existing, true, Some(123));

        for (a, b) in s1.iter().zip(s2.iter()) {
            assert_eq!(a.numbers, b.numbers);
            assert_eq!(a.score, b.score);
        }
    }
}
