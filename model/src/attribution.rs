//! Atribución incremental de contadores acumulados.
//!
//! Los contadores de combine sólo vienen como total de la tarea. Para saber
//! cuánto se combinó en el último evento de una secuencia (último spill,
//! último merge) se resta del total lo ya atribuido a los eventos previos.
//! Los eventos previos no se re-atribuyen: su aporte es el de su propio
//! registro.

use crate::events::{CombineEvent, CombineRecords};

/// Suma de `contribution` sobre todos los eventos menos el último.
pub fn prior_sum<E, S>(events: &[E], contribution: S) -> CombineRecords
where
    S: Fn(&E) -> CombineRecords,
{
    match events.split_last() {
        Some((_, prior)) => total_sum(prior, contribution),
        None => CombineRecords::ZERO,
    }
}

/// Suma de `contribution` sobre todos los eventos.
pub fn total_sum<E, S>(events: &[E], contribution: S) -> CombineRecords
where
    S: Fn(&E) -> CombineRecords,
{
    let mut acc = CombineRecords::ZERO;
    for e in events {
        acc += contribution(e);
    }
    acc
}

/// Registros de combine atribuibles al último evento de `events`.
///
/// - `cumulative`: total de la tarea.
/// - `already_accounted`: lo que se combinó en otra fase y no cuenta acá.
/// - `contribution`: cuánto aporta cada evento previo a la suma.
/// - `measured`: si devuelve `Some` para el último evento, ese valor gana
///   sobre la resta.
///
/// Devuelve `None` si no hay eventos.
pub fn attribute_last<E, S, M>(
    events: &[E],
    cumulative: CombineRecords,
    already_accounted: CombineRecords,
    contribution: S,
    measured: M,
) -> Option<CombineRecords>
where
    S: Fn(&E) -> CombineRecords,
    M: Fn(&E) -> Option<CombineRecords>,
{
    let (last, _) = events.split_last()?;

    if let Some(direct) = measured(last) {
        return Some(direct);
    }

    Some(cumulative - already_accounted - prior_sum(events, contribution))
}

/// Atribución para spills: se prefiere el par medido del último spill.
pub fn attribute_last_spill<E: CombineEvent>(
    events: &[E],
    cumulative: CombineRecords,
) -> Option<CombineRecords> {
    attribute_last(
        events,
        cumulative,
        CombineRecords::ZERO,
        E::contribution,
        E::measured_pair,
    )
}

/// Atribución para merges: siempre por resta, descontando el combine que
/// ya ocurrió en los spills.
pub fn attribute_last_merge<E: CombineEvent>(
    events: &[E],
    cumulative: CombineRecords,
    in_spills: CombineRecords,
) -> Option<CombineRecords> {
    attribute_last(events, cumulative, in_spills, E::contribution, |_| None)
}
