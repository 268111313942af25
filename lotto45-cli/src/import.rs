use anyhow::{Context, Result};
use lotto45_db::rusqlite::Connection;

use lotto45_db::db::{count_draws, insert_draw};
use lotto45_db::models::{Draw, PICK_COUNT, POOL_SIZE, valid_combo};

pub struct ImportResult {
    pub total_lines: u32,
    pub inserted: u32,
    pub ignored: u32,
}

/// Une ligne de listing exploitable : 6 numéros triés, libellé de tour
/// optionnel.
#[derive(Debug, PartialEq, Eq)]
pub struct ParsedLine {
    pub round_label: Option<String>,
    pub numbers: [u8; 6],
}

/// Repère un marqueur de tour « N회 » et retourne le libellé normalisé
/// ainsi que la ligne débarrassée du marqueur, pour que le numéro de tour
/// ne soit pas confondu avec un numéro joué.
fn split_round_marker(line: &str) -> (Option<String>, String) {
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let mut j = i;
        while j < chars.len() && chars[j].is_ascii_digit() {
            j += 1;
        }
        let mut k = j;
        while k < chars.len() && chars[k].is_whitespace() {
            k += 1;
        }
        if k < chars.len() && chars[k] == '회' {
            let digits: String = chars[i..j].iter().collect();
            let rest: String = chars[..i].iter().chain(&chars[k + 1..]).collect();
            return (Some(format!("{digits}회")), rest);
        }
        i = j;
    }
    (None, line.to_string())
}

fn extract_integers(line: &str) -> Vec<u32> {
    let mut out = Vec::new();
    let mut digits = String::new();
    for c in line.chars().chain(std::iter::once(' ')) {
        if c.is_ascii_digit() {
            digits.push(c);
        } else if !digits.is_empty() {
            if let Ok(n) = digits.parse::<u32>() {
                out.push(n);
            }
            digits.clear();
        }
    }
    out
}

/// Extrait une grille d'une ligne collée : les 6 premiers entiers après le
/// marqueur de tour éventuel. Les lignes trop courtes ou invalides
/// (doublons, hors 1-45) sont écartées sans erreur.
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (round_label, rest) = split_round_marker(line);
    let ints = extract_integers(&rest);
    if ints.len() < PICK_COUNT {
        return None;
    }
    if ints[..PICK_COUNT].iter().any(|&n| n == 0 || n > POOL_SIZE as u32) {
        return None;
    }

    let mut numbers = [0u8; 6];
    for (slot, &n) in numbers.iter_mut().zip(&ints[..PICK_COUNT]) {
        *slot = n as u8;
    }
    numbers.sort();
    if !valid_combo(&numbers) {
        return None;
    }

    Some(ParsedLine { round_label, numbers })
}

pub fn parse_paste(text: &str) -> Vec<ParsedLine> {
    text.lines().filter_map(parse_line).collect()
}

/// Importe un listing collé dans la base, une transaction pour tout le
/// lot. Les lignes sans marqueur de tour reçoivent un libellé séquentiel
/// continuant l'historique existant.
pub fn import_text(conn: &Connection, text: &str) -> Result<ImportResult> {
    let tx = conn
        .unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let total_lines = text.lines().filter(|l| !l.trim().is_empty()).count() as u32;
    let rows = parse_paste(text);
    let start = count_draws(&tx)?;

    for (i, row) in rows.iter().enumerate() {
        let round_label = row
            .round_label
            .clone()
            .unwrap_or_else(|| format!("{}회", start + i as u32 + 1));
        insert_draw(
            &tx,
            &Draw {
                round_label,
                numbers: row.numbers,
            },
        )?;
    }

    tx.commit().context("Échec du commit")?;

    let inserted = rows.len() as u32;
    Ok(ImportResult {
        total_lines,
        inserted,
        ignored: total_lines - inserted,
    })
}
