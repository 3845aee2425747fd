//! Pipeline progress events.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    LoadingProject,
    LoadingInventory,
    OpeningStore,
    RegisteringFlows,
    RegisteringProcesses,
    LinkingExchanges,
    BuildingProductSystem,
    ImportingResults,
    Aggregating,
    SavingOutputs,
    Completed,
}

impl RunStage {
    pub fn label(self) -> &'static str {
        match self {
            RunStage::LoadingProject => "loading project",
            RunStage::LoadingInventory => "loading inventory",
            RunStage::OpeningStore => "opening store",
            RunStage::RegisteringFlows => "registering flows",
            RunStage::RegisteringProcesses => "registering processes",
            RunStage::LinkingExchanges => "linking exchanges",
            RunStage::BuildingProductSystem => "building product system",
            RunStage::ImportingResults => "importing results",
            RunStage::Aggregating => "aggregating",
            RunStage::SavingOutputs => "saving outputs",
            RunStage::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
        }
    }
}

/// Optional progress sink threaded through the services.
pub(crate) struct Progress<'a> {
    cb: Option<&'a mut dyn FnMut(RunProgressEvent)>,
    started: std::time::Instant,
}

impl<'a> Progress<'a> {
    pub(crate) fn new(cb: Option<&'a mut dyn FnMut(RunProgressEvent)>) -> Self {
        Self {
            cb,
            started: std::time::Instant::now(),
        }
    }

    pub(crate) fn emit(&mut self, stage: RunStage, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(stage = stage.label(), %message, "progress");
        if let Some(cb) = self.cb.as_deref_mut() {
            cb(RunProgressEvent::stage(
                stage,
                self.started.elapsed().as_secs_f64(),
                Some(message),
            ));
        }
    }
}
