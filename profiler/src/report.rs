use anyhow::{Context, Result};
use model::{CombineSummary, TaskProfile, TaskReport};
use serde::Serialize;
use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Lee un reporte crudo (JSON del recolector) desde disco.
pub fn load_report(path: &Path) -> Result<TaskReport> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("no se pudo leer el reporte {}", path.display()))?;
    let report = TaskReport::from_json(&content)
        .with_context(|| format!("reporte inválido en {}", path.display()))?;
    debug!(
        "reporte {} cargado: {} spills, {} merges",
        path.display(),
        report.spill.spill_info_list.len(),
        report.merge.merge_info_list.len()
    );
    Ok(report)
}

/// Lee el reporte y arma el perfil de la tarea.
pub fn load_profile(path: &Path) -> Result<TaskProfile> {
    let report = load_report(path)?;
    let profile = TaskProfile::from_report(&report)
        .with_context(|| format!("no se pudo armar el perfil de {}", path.display()))?;
    Ok(profile)
}

fn combine_lines(out: &mut String, title: &str, summary: Option<&CombineSummary>) {
    match summary {
        Some(s) => {
            let _ = writeln!(out, "  {}:", title);
            let _ = writeln!(out, "    t_input_records : {}", s.t_combine_input_records);
            let _ = writeln!(out, "    input_records   : {}", s.c_combine_input_records);
            let _ = writeln!(out, "    output_records  : {}", s.c_combine_output_records);
            if let Some(r) = s.ratio() {
                let _ = writeln!(out, "    ratio           : {:.3}", r);
            }
        }
        None => {
            let _ = writeln!(out, "  {}: (no hubo)", title);
        }
    }
}

fn opt(v: Option<i64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Resumen legible de un perfil.
pub fn render_text(p: &TaskProfile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Tarea {}", p.task_id());
    let _ = writeln!(out, "  corriendo: {}", p.is_running());
    let _ = writeln!(out, "  fase: {}", p.running_phase());
    let _ = writeln!(out, "  split_bytes: {}", p.split().split_bytes);

    let buf = p.spill_buffer();
    let _ = writeln!(out, "  io_sort_mb: {}", buf.io_sort_mb);
    let _ = writeln!(
        out,
        "  buffer datos   : soft={} cap={}",
        buf.data.soft_limit, buf.data.capacity
    );
    let _ = writeln!(
        out,
        "  buffer records : soft={} cap={}",
        buf.records.soft_limit, buf.records.capacity
    );

    let m = p.map_func();
    let _ = writeln!(
        out,
        "  map: in_bytes={} (split {}), in_records={}, out_bytes={}, out_records={}",
        m.c_map_input_bytes,
        m.t_map_input_bytes,
        m.c_map_input_records,
        m.c_map_output_bytes,
        m.c_map_output_records
    );

    let _ = writeln!(out, "  spills: {}", p.spill_count());
    for (i, s) in p.spills().iter().enumerate() {
        let _ = writeln!(
            out,
            "    #{:<3} records {} -> {}, bytes {} -> {}",
            i,
            s.records_before,
            opt(s.records_after),
            s.bytes_before,
            opt(s.bytes_after)
        );
    }
    combine_lines(&mut out, "combine en memoria", p.mem_combine_func().map(|f| &f.0));

    let _ = writeln!(out, "  merges: {}", p.merge_count());
    for (i, mg) in p.merges().iter().enumerate() {
        let _ = writeln!(
            out,
            "    #{:<3} partición {} ({} segmentos) records {} -> {}, bytes {} -> {}",
            i,
            mg.partition_id,
            mg.segments,
            mg.records_before,
            opt(mg.records_after),
            mg.bytes_before,
            opt(mg.bytes_after)
        );
    }
    combine_lines(&mut out, "combine en disco", p.disk_combine_func().map(|f| &f.0));

    let r = p.resources();
    let _ = writeln!(
        out,
        "  recursos: file_read={} file_written={} mem_fisica={} committed={}",
        r.file_bytes_read, r.file_bytes_written, r.physical_memory_bytes, r.total_committed_bytes
    );
    out
}

/// Una línea por tarea para el comando `summary`.
pub fn summary_line(p: &TaskProfile) -> String {
    let mem = p
        .mem_combine_func()
        .map(|f| format!("{}->{}", f.c_combine_input_records, f.c_combine_output_records))
        .unwrap_or_else(|| "-".to_string());
    let disk = p
        .disk_combine_func()
        .map(|f| format!("{}->{}", f.c_combine_input_records, f.c_combine_output_records))
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{}  spills={} merges={} mem_combine={} disk_combine={}",
        p.task_id(),
        p.spill_count(),
        p.merge_count(),
        mem,
        disk
    )
}

#[derive(Serialize)]
struct SpillRow {
    index: usize,
    records_before: i64,
    records_after: Option<i64>,
    bytes_before: i64,
    bytes_after: Option<i64>,
}

#[derive(Serialize)]
struct MergeRow {
    index: usize,
    partition_id: i32,
    segments: i32,
    records_before: i64,
    records_after: Option<i64>,
    bytes_before: i64,
    bytes_after: Option<i64>,
}

/// Nombre de archivo seguro para un task id: todo lo que no sea
/// alfanumérico, `_`, `-` o `.` pasa a `_`, así no hay separadores de ruta.
fn file_stem(task_id: &str) -> String {
    task_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Escribe `<task>_spills.csv` y `<task>_merges.csv` en `out_dir`.
/// Los valores no medidos quedan como celdas vacías.
pub fn export_csv(p: &TaskProfile, out_dir: &Path) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("no se pudo crear {}", out_dir.display()))?;
    let stem = file_stem(p.task_id());

    let spills_path = out_dir.join(format!("{}_spills.csv", stem));
    let mut w = csv::Writer::from_path(&spills_path)
        .with_context(|| format!("no se pudo crear {}", spills_path.display()))?;
    for (index, s) in p.spills().iter().enumerate() {
        w.serialize(SpillRow {
            index,
            records_before: s.records_before,
            records_after: s.records_after,
            bytes_before: s.bytes_before,
            bytes_after: s.bytes_after,
        })?;
    }
    w.flush()?;

    let merges_path = out_dir.join(format!("{}_merges.csv", stem));
    let mut w = csv::Writer::from_path(&merges_path)
        .with_context(|| format!("no se pudo crear {}", merges_path.display()))?;
    for (index, m) in p.merges().iter().enumerate() {
        w.serialize(MergeRow {
            index,
            partition_id: m.partition_id,
            segments: m.segments,
            records_before: m.records_before,
            records_after: m.records_after,
            bytes_before: m.bytes_before,
            bytes_after: m.bytes_after,
        })?;
    }
    w.flush()?;

    info!(
        "exportados {} spills y {} merges de {} a {}",
        p.spill_count(),
        p.merge_count(),
        p.task_id(),
        out_dir.display()
    );
    Ok((spills_path, merges_path))
}
