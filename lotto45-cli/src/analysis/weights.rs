use lotto45_db::models::POOL_SIZE;

/// Transforme les comptages en distribution de probabilité lissée.
///
/// Chaque poids vaut (compte + alpha)^beta : alpha garantit un poids non
/// nul aux numéros jamais tirés, beta règle la force du biais (0 donne
/// l'uniforme, 1 est linéaire en fréquence, au-delà de 1 l'écart entre
/// numéros fréquents et rares s'accentue). alpha n'est pas borné ; si le
/// total des poids n'est pas strictement positif (alpha négatif, NaN),
/// la distribution uniforme est retournée à la place.
pub fn weighted_probabilities(counts: &[u32; POOL_SIZE], alpha: f64, beta: f64) -> [f64; POOL_SIZE] {
    let mut weights = [0.0f64; POOL_SIZE];
    for (w, &c) in weights.iter_mut().zip(counts) {
        *w = (c as f64 + alpha).powf(beta);
    }

    let total: f64 = weights.iter().sum();
    if total <= 0.0 || total.is_nan() {
        return [1.0 / POOL_SIZE as f64; POOL_SIZE];
    }

    for w in &mut weights {
        *w /= total;
    }
    weights
}
