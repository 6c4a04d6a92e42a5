//! Failure diagnostics
//!
//! After a deployment fails, every allocation with a task outside the running
//! state is fetched in full and its task events are rendered into a report.
//! Fetches run concurrently, bounded by a semaphore.

mod events;

use events::describe_event;

use pilot_client::ControlPlane;
use pilot_core::domain::allocation::Allocation;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::format::IdLength;

/// Collects per-allocation failure reports for a deployment
#[derive(Clone)]
pub struct FailureDiagnostics {
    client: Arc<dyn ControlPlane>,
    ids: IdLength,
    semaphore: Arc<Semaphore>,
}

impl FailureDiagnostics {
    pub fn new(client: Arc<dyn ControlPlane>, ids: IdLength, concurrency: usize) -> Self {
        Self {
            client,
            ids,
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    /// Logs one report per stalled allocation of the deployment
    pub async fn report(&self, deployment_id: &str) {
        for report in self.collect(deployment_id).await {
            error!("{}", report);
        }
    }

    /// Renders one report per stalled allocation, in the order the scheduler
    /// listed them
    ///
    /// Allocations that cannot be fetched are logged and left out.
    pub async fn collect(&self, deployment_id: &str) -> Vec<String> {
        let allocations = match self.client.deployment_allocations(deployment_id).await {
            Ok(allocations) => allocations,
            Err(e) => {
                error!(
                    "failed to get allocations for deployment \"{}\": {}",
                    self.ids.shorten(deployment_id),
                    e
                );
                return Vec::new();
            }
        };

        let stalled: Vec<String> = allocations
            .into_iter()
            .filter(Allocation::has_stalled_task)
            .map(|alloc| alloc.id)
            .collect();

        debug!(
            "inspecting {} stalled allocation(s) of deployment {}",
            stalled.len(),
            self.ids.shorten(deployment_id)
        );

        let mut handles = Vec::with_capacity(stalled.len());
        for alloc_id in stalled {
            let permit = match self.semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    warn!("diagnostics semaphore closed: {}", e);
                    break;
                }
            };
            handles.push(self.spawn_fetch(alloc_id, permit));
        }

        let mut reports = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(Some(report)) => reports.push(report),
                Ok(None) => {}
                Err(e) => warn!("allocation diagnostics task panicked: {}", e),
            }
        }

        reports
    }

    /// Spawns a task fetching one allocation
    fn spawn_fetch(
        &self,
        alloc_id: String,
        permit: OwnedSemaphorePermit,
    ) -> JoinHandle<Option<String>> {
        let client = Arc::clone(&self.client);
        let ids = self.ids;

        tokio::spawn(async move {
            let _permit = permit;
            match client.allocation_info(&alloc_id).await {
                Ok(alloc) => Some(render_allocation_report(&alloc, ids)),
                Err(e) => {
                    error!(
                        "failed to get allocation \"{}\": {}",
                        ids.shorten(&alloc_id),
                        e
                    );
                    None
                }
            }
        })
    }
}

/// Renders the task states and events of one allocation
pub(crate) fn render_allocation_report(alloc: &Allocation, ids: IdLength) -> String {
    let mut lines = vec![format!("allocation \"{}\" failed:", ids.shorten(&alloc.id))];

    for (name, task) in &alloc.task_states {
        lines.push(format!(
            "  task \"{}\" is {} with the following events:",
            name, task.state
        ));
        for event in &task.events {
            let description = describe_event(event);
            let description = description.trim();
            if !description.is_empty() {
                lines.push(format!("    * {} - {}", event.event_type, description));
            }
        }
    }

    lines.join("\n")
}
