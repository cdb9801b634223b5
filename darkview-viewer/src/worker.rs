//! Render worker: a dedicated thread that owns the PDFium engine and the
//! loaded document. The UI talks to it through a command channel and awaits a
//! oneshot reply per command, so no PDFium type ever crosses threads.

use std::path::PathBuf;
use std::thread;

use darkview_core::{
    DocumentEngine, DocumentId, DocumentInfo, DocumentLoader, Raster, RenderFailure, RenderTicket, ViewerError,
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use crate::renderer::PdfiumEngine;

const WORKER_GONE: &str = "render worker stopped";

enum WorkerCommand {
    Load {
        document: DocumentId,
        bytes: Vec<u8>,
        reply: oneshot::Sender<Result<DocumentInfo, ViewerError>>,
    },
    Render {
        ticket: RenderTicket,
        reply: oneshot::Sender<Result<Raster, RenderFailure>>,
    },
    /// Drop the loaded document, if any
    Release,
}

/// Cheap handle to the render worker
#[derive(Debug, Clone)]
pub struct RenderWorker {
    commands: mpsc::UnboundedSender<WorkerCommand>,
}

impl RenderWorker {
    /// Start the worker thread. The receiver resolves once the engine is bound,
    /// or with the reason it could not be.
    pub fn spawn(library_dir: Option<PathBuf>) -> (Self, oneshot::Receiver<Result<(), String>>) {
        Self::spawn_with(move || PdfiumEngine::new(library_dir.as_deref()))
    }

    /// Start the worker with an engine built on the worker thread by `init`
    pub fn spawn_with<E, F>(init: F) -> (Self, oneshot::Receiver<Result<(), String>>)
    where
        E: DocumentEngine,
        F: FnOnce() -> anyhow::Result<E> + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = oneshot::channel();

        let spawned = thread::Builder::new()
            .name("darkview-render".into())
            .spawn(move || worker_main(init, command_rx, ready_tx));
        if let Err(err) = spawned {
            // ready_tx went down with the closure, so the receiver reports it
            error!("Failed to spawn render worker: {err}");
        }

        (Self { commands: command_tx }, ready_rx)
    }

    pub async fn load(self, document: DocumentId, bytes: Vec<u8>) -> Result<DocumentInfo, ViewerError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(WorkerCommand::Load {
                document,
                bytes,
                reply,
            })
            .map_err(|_| ViewerError::EngineUnavailable(WORKER_GONE.into()))?;
        response
            .await
            .map_err(|_| ViewerError::EngineUnavailable(WORKER_GONE.into()))?
    }

    /// Commands run in order, so a render sent after this sees no document
    pub fn release(&self) {
        if self.commands.send(WorkerCommand::Release).is_err() {
            debug!("Render worker already stopped, nothing to release");
        }
    }

    pub async fn render(self, ticket: RenderTicket) -> Result<Raster, RenderFailure> {
        let gone = || RenderFailure::Unavailable {
            reason: WORKER_GONE.into(),
        };
        let (reply, response) = oneshot::channel();
        self.commands
            .send(WorkerCommand::Render { ticket, reply })
            .map_err(|_| gone())?;
        response.await.map_err(|_| gone())?
    }
}

fn worker_main<E, F>(
    init: F,
    mut commands: mpsc::UnboundedReceiver<WorkerCommand>,
    ready: oneshot::Sender<Result<(), String>>,
) where
    E: DocumentEngine,
    F: FnOnce() -> anyhow::Result<E>,
{
    let engine = match init() {
        Ok(engine) => engine,
        Err(err) => {
            error!("Rendering engine initialization failed: {err:#}");
            let _ = ready.send(Err(format!("{err:#}")));
            return;
        }
    };
    info!("Rendering engine ready, render worker running");
    let _ = ready.send(Ok(()));

    let mut loader = DocumentLoader::new(engine);
    while let Some(command) = commands.blocking_recv() {
        match command {
            WorkerCommand::Load {
                document,
                bytes,
                reply,
            } => {
                let _ = reply.send(loader.load(document, bytes));
            }
            WorkerCommand::Render { ticket, reply } => {
                debug!(
                    "Rendering page {} at {} (dark: {}) for {:?}",
                    ticket.page, ticket.scale, ticket.dark_mode, ticket.id
                );
                let _ = reply.send(loader.render(&ticket));
            }
            WorkerCommand::Release => loader.release(),
        }
    }
    debug!("Render worker shutting down");
}
