use anyhow::{Context, Result};
use std::path::Path;

use lotto45_db::models::Draw;

/// Écrit l'historique au format CSV, en-tête `round,n1..n6`, du tour le
/// plus ancien au plus récent. `draws[0]` = tirage le plus récent.
pub fn export_csv(draws: &[Draw], path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Impossible de créer {:?}", path))?;

    writer
        .write_record(["round", "n1", "n2", "n3", "n4", "n5", "n6"])
        .context("Échec de l'écriture de l'en-tête")?;

    for draw in draws.iter().rev() {
        let mut record = vec![draw.round_label.clone()];
        record.extend(draw.numbers.iter().map(|n| n.to_string()));
        writer
            .write_record(&record)
            .with_context(|| format!("Échec de l'écriture du tour {}", draw.round_label))?;
    }

    writer.flush().context("Échec de l'écriture du fichier")?;
    Ok(())
}
