//! Perfil de una tarea map y su builder.
//!
//! El recolector arma el perfil por partes (info básica, split, buffer,
//! spills, merges, contadores) y al final llama a `build()`, que deriva los
//! resúmenes de combine y devuelve un `TaskProfile` inmutable.

use serde::Serialize;
use tracing::debug;

use crate::attribution::{attribute_last_merge, attribute_last_spill, total_sum};
use crate::conf::JobConf;
use crate::counters::CumulativeCounters;
use crate::error::ProfileError;
use crate::events::{CombineEvent, MergeAction, SpillPiece};
use crate::phases::{
    BufferLimits, CombineSummary, DiskCombineFunc, InputSplit, MapFunc, MemCombineFunc,
    SpillBuffer, TaskResources,
};
use crate::raw::{Input, MapperBuffer, Merge, Spill, TaskInfo, TaskReport};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskProfile {
    task_id: String,
    is_running: bool,
    running_phase: String,
    conf: JobConf,

    split: InputSplit,
    spill_buffer: SpillBuffer,
    map_func: MapFunc,
    spills: Vec<SpillPiece>,
    mem_combine_func: Option<MemCombineFunc>,
    merges: Vec<MergeAction>,
    disk_combine_func: Option<DiskCombineFunc>,
    resources: TaskResources,
}

impl TaskProfile {
    pub fn builder(conf: JobConf) -> TaskProfileBuilder {
        TaskProfileBuilder::new(conf)
    }

    /// Arma el perfil a partir de un reporte completo, en el mismo orden
    /// en que lo haría el pipeline de ingesta.
    pub fn from_report(report: &TaskReport) -> Result<TaskProfile, ProfileError> {
        let mut b = TaskProfileBuilder::new(report.conf.clone());
        b.basic_info(&report.task);
        b.input_split(&report.input);
        b.spill_buffer(&report.buffer);
        b.spills(&report.spill, &report.counters);
        b.merges(&report.merge, &report.counters)?;
        b.counters(&report.counters);
        b.build()
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn running_phase(&self) -> &str {
        &self.running_phase
    }

    pub fn conf(&self) -> &JobConf {
        &self.conf
    }

    pub fn split(&self) -> &InputSplit {
        &self.split
    }

    pub fn spill_buffer(&self) -> &SpillBuffer {
        &self.spill_buffer
    }

    pub fn map_func(&self) -> &MapFunc {
        &self.map_func
    }

    /// Spills en el orden en que los reportó el runtime.
    pub fn spills(&self) -> &[SpillPiece] {
        &self.spills
    }

    pub fn mem_combine_func(&self) -> Option<&MemCombineFunc> {
        self.mem_combine_func.as_ref()
    }

    /// Merges en el orden en que los reportó el runtime.
    pub fn merges(&self) -> &[MergeAction] {
        &self.merges
    }

    pub fn disk_combine_func(&self) -> Option<&DiskCombineFunc> {
        self.disk_combine_func.as_ref()
    }

    pub fn resources(&self) -> &TaskResources {
        &self.resources
    }

    pub fn spill_count(&self) -> usize {
        self.spills.len()
    }

    pub fn merge_count(&self) -> usize {
        self.merges.len()
    }

    pub fn mem_combine_ratio(&self) -> Option<f64> {
        self.mem_combine_func.as_ref().and_then(|f| f.ratio())
    }
}

/// Acumula las partes del perfil. Las atribuciones se calculan en `build()`,
/// así no importa si los spills llegan antes o después de los merges.
#[derive(Debug, Clone)]
pub struct TaskProfileBuilder {
    conf: JobConf,
    task_id: Option<String>,
    is_running: bool,
    running_phase: String,

    split: InputSplit,
    spill_buffer: SpillBuffer,
    map_func: MapFunc,
    resources: TaskResources,

    spills: Vec<SpillPiece>,
    merges: Vec<MergeAction>,

    // contadores con los que se atribuye cada fase (el último llamado gana)
    spill_counters: Option<CumulativeCounters>,
    disk_combine_counters: Option<CumulativeCounters>,
}

impl TaskProfileBuilder {
    pub fn new(conf: JobConf) -> Self {
        Self {
            conf,
            task_id: None,
            is_running: false,
            running_phase: String::new(),
            split: InputSplit::default(),
            spill_buffer: SpillBuffer::default(),
            map_func: MapFunc::default(),
            resources: TaskResources::default(),
            spills: Vec::new(),
            merges: Vec::new(),
            spill_counters: None,
            disk_combine_counters: None,
        }
    }

    pub fn basic_info(&mut self, task: &TaskInfo) -> &mut Self {
        self.task_id = Some(task.task_id.clone());
        self.is_running = task.is_map_running;
        self.running_phase = task.running_phase.clone();
        self
    }

    pub fn input_split(&mut self, input: &Input) -> &mut Self {
        self.split.split_bytes = input.split_bytes;
        self.map_func.t_map_input_bytes = input.split_bytes;
        self
    }

    pub fn spill_buffer(&mut self, buffer: &MapperBuffer) -> &mut Self {
        self.spill_buffer = SpillBuffer {
            io_sort_mb: self.conf.io_sort_mb,
            data: BufferLimits {
                soft_limit: buffer.soft_buffer_limit,
                capacity: buffer.kvbuffer_bytes,
            },
            records: BufferLimits {
                soft_limit: buffer.soft_record_limit,
                capacity: buffer.kvoffsets_len,
            },
        };
        self
    }

    /// Agrega los spills en orden. Si el job tiene combiner, el último spill
    /// de la secuencia recibe la atribución del combine en memoria.
    pub fn spills(&mut self, spill: &Spill, counters: &CumulativeCounters) -> &mut Self {
        self.spills
            .extend(spill.spill_info_list.iter().map(SpillPiece::from));
        self.spill_counters = Some(counters.clone());
        self
    }

    /// Agrega los merges en orden. Si `merge.has_combine`, el último merge
    /// recibe la atribución del combine en disco.
    ///
    /// Precondición: con `has_combine` tiene que haber al menos un merge.
    /// Si no, devuelve error y el builder queda como estaba.
    pub fn merges(
        &mut self,
        merge: &Merge,
        counters: &CumulativeCounters,
    ) -> Result<&mut Self, ProfileError> {
        if merge.has_combine && self.merges.is_empty() && merge.merge_info_list.is_empty() {
            return Err(ProfileError::EmptyMerges {
                task_id: self.task_id.clone().unwrap_or_default(),
            });
        }

        self.merges
            .extend(merge.merge_info_list.iter().map(MergeAction::from));
        self.disk_combine_counters = merge.has_combine.then(|| counters.clone());
        Ok(self)
    }

    /// Copia los contadores de la fase map. Se puede llamar varias veces.
    pub fn counters(&mut self, counters: &CumulativeCounters) -> &mut Self {
        self.map_func.apply_counters(counters);
        self.resources = TaskResources::from(counters);
        self
    }

    pub fn build(self) -> Result<TaskProfile, ProfileError> {
        let task_id = match self.task_id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(ProfileError::MissingTaskId),
        };

        // con combiner siempre hay resumen; sin spills queda en cero
        let mem_combine_func = match (&self.spill_counters, self.spills.last()) {
            _ if !self.conf.has_combiner() => None,
            (Some(counters), Some(last)) => {
                attribute_last_spill(&self.spills, counters.combine_records()).map(|attributed| {
                    debug!(
                        "task {}: combine en memoria por {} (in={}, out={})",
                        task_id,
                        if last.records_after.is_some() { "medición" } else { "resta" },
                        attributed.input,
                        attributed.output
                    );
                    MemCombineFunc(CombineSummary::new(last.records_before, attributed))
                })
            }
            _ => Some(MemCombineFunc::default()),
        };

        let disk_combine_func = match (&self.disk_combine_counters, self.merges.last()) {
            (Some(counters), Some(last)) => {
                let in_spills = total_sum(&self.spills, SpillPiece::contribution);
                attribute_last_merge(&self.merges, counters.combine_records(), in_spills).map(
                    |attributed| {
                        debug!(
                            "task {}: combine en disco (in={}, out={}), descontando spills in={} out={}",
                            task_id, attributed.input, attributed.output, in_spills.input, in_spills.output
                        );
                        DiskCombineFunc(CombineSummary::new(last.records_before, attributed))
                    },
                )
            }
            _ => None,
        };

        Ok(TaskProfile {
            task_id,
            is_running: self.is_running,
            running_phase: self.running_phase,
            conf: self.conf,
            split: self.split,
            spill_buffer: self.spill_buffer,
            map_func: self.map_func,
            spills: self.spills,
            mem_combine_func,
            merges: self.merges,
            disk_combine_func,
            resources: self.resources,
        })
    }
}
