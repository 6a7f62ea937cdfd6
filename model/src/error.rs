use thiserror::Error;

/// Errores al armar el perfil de una tarea.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// No se llamó a `basic_info` o el id vino vacío.
    #[error("el perfil de la tarea no tiene task id")]
    MissingTaskId,

    /// El recolector marcó combine en disco pero no mandó ningún merge.
    #[error("tarea {task_id}: el merge reporta combine pero la lista de merges está vacía")]
    EmptyMerges { task_id: String },
}
