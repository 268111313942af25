use std::collections::HashSet;

/// Taille de l'univers Lotto 6/45 : numéros 1 à 45.
pub const POOL_SIZE: usize = 45;
/// Nombre de numéros par grille.
pub const PICK_COUNT: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub round_label: String,
    pub numbers: [u8; 6],
}

/// Vrai si `numbers` forme une grille jouable : exactement 6 numéros,
/// tous distincts, chacun entre 1 et 45.
pub fn valid_combo(numbers: &[u8]) -> bool {
    if numbers.len() != PICK_COUNT {
        return false;
    }
    for (i, &n) in numbers.iter().enumerate() {
        if n < 1 || n as usize > POOL_SIZE {
            return false;
        }
        if numbers[i + 1..].contains(&n) {
            return false;
        }
    }
    true
}

/// Combinaisons canoniques (triées) de tout l'historique, pour le test
/// d'appartenance du mode « exclure les grilles déjà tirées ».
pub fn existing_combos(draws: &[Draw]) -> HashSet<[u8; 6]> {
    draws
        .iter()
        .map(|d| {
            let mut combo = d.numbers;
            combo.sort();
            combo
        })
        .collect()
}

/// Prochain libellé de tour. `draws[0]` = tirage le plus récent.
///
/// Les libellés suivent la numérotation coréenne « N회 » ; on extrait le
/// premier entier du libellé le plus récent et on l'incrémente. Sans
/// chiffre exploitable, on retombe sur la taille de l'historique + 1.
pub fn next_round_label(draws: &[Draw]) -> String {
    if draws.is_empty() {
        return "1회".to_string();
    }
    let base = first_integer(&draws[0].round_label).unwrap_or(draws.len() as u64);
    format!("{}회", base + 1)
}

fn first_integer(s: &str) -> Option<u64> {
    let digits: String = s
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[derive(Debug, Clone)]
pub struct NumberStats {
    pub number: u8,
    pub frequency: u32,
    pub gap: u32,
}

#[derive(Debug, Clone)]
pub struct NumberProbability {
    pub number: u8,
    pub probability: f64,
    pub tag: ProbabilityTag,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProbabilityTag {
    Hot,
    Cold,
    Normal,
}

impl std::fmt::Display for ProbabilityTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbabilityTag::Hot => write!(f, "HOT"),
            ProbabilityTag::Cold => write!(f, "COLD"),
            ProbabilityTag::Normal => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Suggestion {
    pub numbers: [u8; 6],
    pub score: f64,
}
