//! The driver: attached-tablet lifecycle and the shared report pipeline.
//!
//! A [`Driver`] binds at most one tablet at a time.  Opening a tablet
//! starts one [`ReportReader`] per endpoint and subscribes the shared
//! pipeline to each, so parsed reports flow from the reader threads into
//! the active output mode without crossing the daemon facade.
//!
//! # Locking
//!
//! [`PipelineShared`] is touched from reader threads and from the daemon
//! facade.  Lock order is always output mode, then pointer, then injector;
//! `deliver` holds all three for the duration of one report, which is what
//! serializes pen and aux streams against each other and against settings
//! application.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tablet_core::{
    InputInjector, OutputContext, OutputMode, Report, TabletDescriptor, VirtualPointer,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::infrastructure::device::{DeviceError, DeviceProvider};
use crate::infrastructure::reader::ReportReader;
use crate::infrastructure::report_parser::{AuxReportParser, StructuredReportParser};
use crate::infrastructure::storage::descriptors::DescriptorSource;

/// Error type for driver operations.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error("no tablet is attached")]
    NoTablet,
}

/// Pipeline state shared between the reader threads and the facade.
pub struct PipelineShared {
    output_mode: Mutex<Option<Box<dyn OutputMode>>>,
    binding_enabled: AtomicBool,
    pointer: Mutex<Box<dyn VirtualPointer>>,
    injector: Mutex<Box<dyn InputInjector>>,
}

impl PipelineShared {
    fn new(pointer: Box<dyn VirtualPointer>, injector: Box<dyn InputInjector>) -> Self {
        Self {
            output_mode: Mutex::new(None),
            binding_enabled: AtomicBool::new(false),
            pointer: Mutex::new(pointer),
            injector: Mutex::new(injector),
        }
    }

    /// Runs one report through the active output mode.  A report arriving
    /// while no mode is installed is discarded.
    fn deliver(&self, report: &Report, aux: bool) {
        let mut mode_guard = self.output_mode.lock().expect("lock poisoned");
        let Some(mode) = mode_guard.as_mut() else {
            return;
        };
        let mut pointer = self.pointer.lock().expect("lock poisoned");
        let mut injector = self.injector.lock().expect("lock poisoned");
        let mut ctx = OutputContext {
            pointer: pointer.as_mut(),
            injector: injector.as_mut(),
            binding_enabled: self.binding_enabled.load(Ordering::Relaxed),
        };
        if aux {
            mode.handle_aux_report(*report, &mut ctx);
        } else {
            mode.handle_report(*report, &mut ctx);
        }
    }
}

struct AttachedTablet {
    descriptor: TabletDescriptor,
    tablet_reader: Arc<ReportReader>,
    aux_reader: Option<Arc<ReportReader>>,
}

/// Owns the device binding and the shared pipeline.
pub struct Driver {
    provider: Box<dyn DeviceProvider>,
    pipeline: Arc<PipelineShared>,
    attached: Option<AttachedTablet>,
}

impl Driver {
    pub fn new(
        provider: Box<dyn DeviceProvider>,
        pointer: Box<dyn VirtualPointer>,
        injector: Box<dyn InputInjector>,
    ) -> Self {
        Self {
            provider,
            pipeline: Arc::new(PipelineShared::new(pointer, injector)),
            attached: None,
        }
    }

    /// Binds to the hardware matching `descriptor`, replacing any current
    /// binding.  Starts one reader per endpoint and wires the pipeline in
    /// as their first subscriber.
    pub fn open(&mut self, descriptor: TabletDescriptor) -> Result<(), DriverError> {
        self.close();

        let endpoints = self.provider.open(&descriptor)?;

        let pen_parser = Arc::new(StructuredReportParser::new(&descriptor));
        let tablet_reader = ReportReader::start(endpoints.tablet, pen_parser, "tablet")?;
        let pen_pipeline = Arc::clone(&self.pipeline);
        tablet_reader.subscribe(Arc::new(move |report: &Report| {
            pen_pipeline.deliver(report, false);
        }));

        let aux_reader = match endpoints.aux {
            Some(source) => {
                let aux_parser = Arc::new(AuxReportParser::new(&descriptor));
                let reader = ReportReader::start(source, aux_parser, "aux")?;
                let aux_pipeline = Arc::clone(&self.pipeline);
                reader.subscribe(Arc::new(move |report: &Report| {
                    aux_pipeline.deliver(report, true);
                }));
                Some(reader)
            }
            None => None,
        };

        // A mode installed before the tablet was opened picks up the new
        // descriptor here.
        if let Some(mode) = self
            .pipeline
            .output_mode
            .lock()
            .expect("lock poisoned")
            .as_mut()
        {
            mode.set_descriptor(&descriptor);
        }

        info!(
            tablet = descriptor.name.as_str(),
            aux = aux_reader.is_some(),
            "tablet opened"
        );
        self.attached = Some(AttachedTablet {
            descriptor,
            tablet_reader,
            aux_reader,
        });
        Ok(())
    }

    /// Releases the current binding, stopping both readers.  A no-op when
    /// nothing is attached.
    pub fn close(&mut self) {
        if let Some(attached) = self.attached.take() {
            attached.tablet_reader.stop();
            if let Some(aux) = attached.aux_reader {
                aux.stop();
            }
            info!(tablet = attached.descriptor.name.as_str(), "tablet closed");
        }
    }

    /// Walks `source`'s candidates in order and binds the first model whose
    /// hardware is attached.  Returns the bound descriptor, or `None` when
    /// no candidate matched; the driver stays unbound in that case.
    pub fn detect(&mut self, source: &dyn DescriptorSource) -> Option<TabletDescriptor> {
        for candidate in source.candidates() {
            let name = candidate.name.clone();
            match self.open(candidate) {
                Ok(()) => {
                    return self.attached.as_ref().map(|a| a.descriptor.clone());
                }
                Err(e) => {
                    debug!(tablet = name.as_str(), error = %e, "candidate not attached");
                }
            }
        }
        info!("no supported tablet detected");
        None
    }

    pub fn descriptor(&self) -> Option<&TabletDescriptor> {
        self.attached.as_ref().map(|a| &a.descriptor)
    }

    pub fn tablet_reader(&self) -> Option<Arc<ReportReader>> {
        self.attached.as_ref().map(|a| Arc::clone(&a.tablet_reader))
    }

    pub fn aux_reader(&self) -> Option<Arc<ReportReader>> {
        self.attached.as_ref().and_then(|a| a.aux_reader.clone())
    }

    /// Installs `mode` as the active output mode, discarding the previous
    /// one together with its filter chain.  `None` uninstalls.
    pub fn set_output_mode(&self, mode: Option<Box<dyn OutputMode>>) {
        *self.pipeline.output_mode.lock().expect("lock poisoned") = mode;
    }

    /// Runs `f` against the active output mode while holding the pipeline
    /// lock, so no report interleaves with the mutation.
    pub fn with_output_mode<R>(&self, f: impl FnOnce(&mut dyn OutputMode) -> R) -> Option<R> {
        let mut guard = self.pipeline.output_mode.lock().expect("lock poisoned");
        guard.as_mut().map(|mode| f(mode.as_mut()))
    }

    pub fn has_output_mode(&self) -> bool {
        self.pipeline
            .output_mode
            .lock()
            .expect("lock poisoned")
            .is_some()
    }

    /// Gates binding dispatch process-wide.  Pointer motion is unaffected.
    pub fn set_binding_enabled(&self, enabled: bool) {
        self.pipeline
            .binding_enabled
            .store(enabled, Ordering::Relaxed);
        info!(enabled, "binding dispatch gate");
    }

    pub fn binding_enabled(&self) -> bool {
        self.pipeline.binding_enabled.load(Ordering::Relaxed)
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        self.close();
    }
}
