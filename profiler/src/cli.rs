use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::glob;
use std::{env, path::PathBuf};
use tracing::{info, warn};

use crate::report;

/// Patrón por defecto de los reportes crudos.
/// Se puede sobreescribir con PROFILE_GLOB.
fn default_glob() -> String {
    env::var("PROFILE_GLOB").unwrap_or_else(|_| "profiles/*.json".to_string())
}

/// Directorio por defecto para `export`.
/// Se puede sobreescribir con PROFILER_OUTPUT_DIR.
fn default_output_dir() -> String {
    env::var("PROFILER_OUTPUT_DIR").unwrap_or_else(|_| "profiles/out".to_string())
}

#[derive(Parser)]
#[command(name = "profiler")]
#[command(about = "Arma el perfil de tareas map a partir de sus reportes crudos")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Muestra el perfil de una tarea
    Show {
        #[arg(value_name = "REPORTE")]
        report: PathBuf,

        /// Imprime el perfil completo como JSON
        #[arg(long)]
        json: bool,
    },
    /// Una línea por tarea para todos los reportes que matcheen el patrón
    Summary {
        #[arg(value_name = "PATRON")]
        pattern: Option<String>,
    },
    /// Exporta spills y merges de una tarea a CSV
    Export {
        #[arg(value_name = "REPORTE")]
        report: PathBuf,

        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Show { report, json } => {
            let profile = report::load_profile(&report)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
            } else {
                print!("{}", report::render_text(&profile));
            }
        }

        Commands::Summary { pattern } => {
            let pattern = pattern.unwrap_or_else(default_glob);
            let entries =
                glob(&pattern).with_context(|| format!("patrón inválido: {}", pattern))?;

            let mut ok = 0usize;
            let mut failed = 0usize;
            for entry in entries {
                let path = match entry {
                    Ok(path) if path.is_file() => path,
                    Ok(_) => continue,
                    Err(e) => {
                        warn!("no se pudo leer una entrada del glob: {}", e);
                        failed += 1;
                        continue;
                    }
                };

                match report::load_profile(&path) {
                    Ok(profile) => {
                        println!("{}", report::summary_line(&profile));
                        ok += 1;
                    }
                    Err(e) => {
                        warn!("salteando {}: {:#}", path.display(), e);
                        failed += 1;
                    }
                }
            }

            info!("{} tareas procesadas, {} con error ({})", ok, failed, pattern);
            if ok == 0 && failed == 0 {
                println!("No hay reportes que matcheen {}", pattern);
            }
        }

        Commands::Export { report, out_dir } => {
            let out_dir = out_dir.unwrap_or_else(|| PathBuf::from(default_output_dir()));
            let profile = report::load_profile(&report)?;
            let (spills, merges) = report::export_csv(&profile, &out_dir)?;

            println!("Exportado:");
            println!("  spills: {}", spills.display());
            println!("  merges: {}", merges.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_es_consistente() {
        Cli::command().debug_assert();
    }

    #[test]
    fn show_parsea_flag_json() {
        let cli = Cli::try_parse_from(["profiler", "show", "t.json", "--json"]).unwrap();
        match cli.command {
            Commands::Show { report, json } => {
                assert_eq!(report, PathBuf::from("t.json"));
                assert!(json);
            }
            _ => panic!("se esperaba show"),
        }
    }

    #[test]
    fn summary_sin_patron_usa_default() {
        let cli = Cli::try_parse_from(["profiler", "summary"]).unwrap();
        match cli.command {
            Commands::Summary { pattern } => assert!(pattern.is_none()),
            _ => panic!("se esperaba summary"),
        }
    }

    #[test]
    fn export_acepta_out_dir() {
        let cli =
            Cli::try_parse_from(["profiler", "export", "t.json", "--out-dir", "/tmp/x"]).unwrap();
        match cli.command {
            Commands::Export { out_dir, .. } => assert_eq!(out_dir, Some(PathBuf::from("/tmp/x"))),
            _ => panic!("se esperaba export"),
        }
    }
}
