mod analysis;
mod display;
mod export;
mod import;

use std::collections::HashSet;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::analysis::sampler::generate_suggestions;
use crate::analysis::weights::weighted_probabilities;
use crate::analysis::{compute_stats, frequency_counts, number_probabilities, tag_probabilities};
use crate::display::{
    display_draws, display_import_summary, display_probabilities, display_stats,
    display_suggestions,
};
use lotto45_db::db::{
    count_draws, db_path, fetch_draws, fetch_last_draws, insert_draw, migrate, open_db,
};
use lotto45_db::models::{Draw, existing_combos, next_round_label, valid_combo};
use lotto45_db::rusqlite::Connection;

#[derive(Parser)]
#[command(name = "lotto45", about = "Générateur pondéré de grilles Lotto 6/45")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer un listing de tirages collé (fichier ou entrée standard)
    Import {
        /// Fichier texte à importer (défaut : entrée standard)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Afficher les statistiques (fréquences et retards)
    Stats {
        /// Fenêtre d'analyse (nombre de tirages, 0 = tout l'historique)
        #[arg(short, long, default_value = "0")]
        window: u32,
    },

    /// Générer des grilles par tirage pondéré sur l'historique
    Play {
        /// Lissage additif : garantit un poids non nul aux numéros jamais tirés
        #[arg(short, long, default_value = "1.0")]
        alpha: f64,

        /// Force du biais : 0 = uniforme, 1 = linéaire en fréquence, au-delà accentue les numéros fréquents
        #[arg(short, long, default_value = "1.0")]
        beta: f64,

        /// Ne compter que les K derniers tirages (0 = tout l'historique)
        #[arg(short, long, default_value = "0")]
        recent: u32,

        /// Nombre de grilles à générer
        #[arg(short, long, default_value = "5")]
        count: usize,

        /// Ne pas écarter les combinaisons déjà présentes dans l'historique
        #[arg(long)]
        allow_duplicates: bool,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Ajouter un tirage manuellement
    Add {
        /// Libellé du tour (défaut : déduit de l'historique)
        #[arg(short, long)]
        round: Option<String>,
    },

    /// Exporter l'historique au format CSV
    Export {
        /// Fichier de sortie
        #[arg(short, long, default_value = "lotto45_data.csv")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { file } => cmd_import(&conn, file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, last),
        Command::Stats { window } => cmd_stats(&conn, window),
        Command::Play {
            alpha,
            beta,
            recent,
            count,
            allow_duplicates,
            seed,
        } => cmd_play(&conn, alpha, beta, recent, count, allow_duplicates, seed),
        Command::Add { round } => cmd_add(&conn, round),
        Command::Export { file } => cmd_export(&conn, &file),
    }
}

fn cmd_import(conn: &Connection, file: Option<PathBuf>) -> Result<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Impossible de lire {:?}", path))?,
        None => {
            println!("Collez le listing puis terminez par Ctrl-D :");
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Erreur de lecture")?;
            buf
        }
    };

    let result = import::import_text(conn, &text)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &Connection, last: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : lotto45 import");
        return Ok(());
    }
    let draws = fetch_last_draws(conn, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_stats(conn: &Connection, window: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : lotto45 import");
        return Ok(());
    }
    let effective_window = if window > 0 { window.min(n) } else { n };
    let draws = fetch_last_draws(conn, effective_window)?;

    let stats = compute_stats(&draws);
    display_stats(&stats, effective_window);
    Ok(())
}

fn cmd_play(
    conn: &Connection,
    alpha: f64,
    beta: f64,
    recent: u32,
    count: usize,
    allow_duplicates: bool,
    seed: Option<u64>,
) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : lotto45 import");
        return Ok(());
    }
    let draws = fetch_draws(conn)?;

    let counts = frequency_counts(&draws, recent as usize);
    let probs = weighted_probabilities(&counts, alpha, beta);

    let mut number_probs = number_probabilities(&probs);
    tag_probabilities(&mut number_probs);
    display_probabilities(&number_probs, alpha, beta, recent);

    let exclude_exact = !allow_duplicates;
    let existing = if exclude_exact {
        existing_combos(&draws)
    } else {
        HashSet::new()
    };

    let suggestions = generate_suggestions(&probs, count, &existing, exclude_exact, seed);
    display_suggestions(&suggestions);
    Ok(())
}

fn cmd_add(conn: &Connection, round: Option<String>) -> Result<()> {
    println!("Ajout d'un tirage\n");

    let draws = fetch_draws(conn)?;
    let round_label = match round {
        Some(r) if !r.trim().is_empty() => r.trim().to_string(),
        _ => {
            let auto = next_round_label(&draws);
            let input = prompt(&format!("Libellé du tour [{auto}] : "))?;
            if input.is_empty() { auto } else { input }
        }
    };

    let numbers = prompt_numbers()?;
    let draw = Draw {
        round_label,
        numbers,
    };

    println!("\nTirage à insérer :");
    display_draws(&[draw.clone()]);

    let confirm = prompt("\nConfirmer l'insertion ? (o/n) : ")?;
    if confirm.trim().to_lowercase() == "o" {
        insert_draw(conn, &draw)?;
        println!(
            "{} ajouté ({} tirages au total).",
            draw.round_label,
            count_draws(conn)?
        );
    } else {
        println!("Insertion annulée.");
    }

    Ok(())
}

fn cmd_export(conn: &Connection, file: &PathBuf) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide, rien à exporter.");
        return Ok(());
    }
    let draws = fetch_draws(conn)?;
    export::export_csv(&draws, file)?;
    println!("CSV exporté : {} ({} tirages)", file.display(), draws.len());
    Ok(())
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    Ok(input.trim().to_string())
}

fn prompt_numbers() -> Result<[u8; 6]> {
    loop {
        let input = prompt("6 numéros (1-45, séparés par des espaces) : ")?;
        let nums: Result<Vec<u8>, _> = input.split_whitespace().map(|s| s.parse::<u8>()).collect();
        match nums {
            Ok(v) if valid_combo(&v) => {
                let mut arr = [0u8; 6];
                arr.copy_from_slice(&v);
                arr.sort();
                return Ok(arr);
            }
            _ => println!("Entrez 6 numéros distincts entre 1 et 45. Réessayez."),
        }
    }
}
