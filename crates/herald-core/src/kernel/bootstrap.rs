use std::path::PathBuf;
use std::sync::Arc;

use crate::event::dispatcher::{EventBus, SharedEventBus};
use crate::event::dynamic::DynamicListenerLoader;
use crate::event::DefaultEventManager;
use crate::kernel::component::{KernelComponent, Service, ServiceContainer};
use crate::kernel::constants;
use crate::kernel::error::{Error, KernelLifecyclePhase, Result};
use crate::storage::config::{EventsConfig, load_events_config};

/// Builder for [`Application`]
#[derive(Default)]
pub struct ApplicationBuilder {
    app_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
    config: Option<EventsConfig>,
    services: Vec<(String, Arc<dyn Service>)>,
}

impl ApplicationBuilder {
    /// Application directory; defaults to the current directory
    pub fn app_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.app_dir = Some(dir.into());
        self
    }

    /// Load the events configuration from this file
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Use this configuration directly; takes precedence over `config_file`
    pub fn config(mut self, config: EventsConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn service(mut self, name: impl Into<String>, service: Arc<dyn Service>) -> Self {
        self.services.push((name.into(), service));
        self
    }

    pub fn build(self) -> Result<Application> {
        log::info!("Initializing {} v{}", constants::APP_NAME, constants::APP_VERSION);

        let app_dir = match self.app_dir {
            Some(dir) => dir,
            None => std::env::current_dir().map_err(|e| Error::KernelLifecycleError {
                phase: KernelLifecyclePhase::Bootstrap,
                component_name: None,
                message: format!("Cannot determine the application directory: {}", e),
                source: None,
            })?,
        };

        let config = match (self.config, self.config_path) {
            (Some(config), _) => config,
            (None, Some(path)) => load_events_config(&path)?,
            (None, None) => EventsConfig::default(),
        };

        let mut container = ServiceContainer::new(app_dir.clone());
        for (name, service) in self.services {
            container.register_service(name, service);
        }
        let container = Arc::new(container);
        log::info!("Using application directory: {}", app_dir.display());

        let bus = EventBus::new()
            .with_container(Arc::clone(&container))
            .with_config(config.clone());
        let dynamic = config.dynamic_enabled.then(|| {
            DynamicListenerLoader::new(config.dynamic_root(&app_dir), Arc::clone(&container))
        });
        let event_manager = Arc::new(DefaultEventManager::with_bus(SharedEventBus::new(bus), dynamic));

        Ok(Application {
            running: false,
            config,
            container,
            components: vec![event_manager.clone() as Arc<dyn KernelComponent>],
            event_manager,
        })
    }
}

/// Main application struct: owns the shared context and the event manager
pub struct Application {
    running: bool,
    config: EventsConfig,
    container: Arc<ServiceContainer>,
    event_manager: Arc<DefaultEventManager>,
    // Lifecycle order; stopped in reverse
    components: Vec<Arc<dyn KernelComponent>>,
}

impl Application {
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::default()
    }

    /// Application rooted at the current directory with default configuration
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn event_manager(&self) -> Arc<DefaultEventManager> {
        self.event_manager.clone()
    }

    pub fn container(&self) -> Arc<ServiceContainer> {
        self.container.clone()
    }

    pub fn config(&self) -> &EventsConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Initialize then start every component, in order
    pub async fn start(&mut self) -> Result<()> {
        if self.running {
            return Err(Error::KernelLifecycleError {
                phase: KernelLifecyclePhase::Start,
                component_name: None,
                message: "Application already started".to_string(),
                source: None,
            });
        }

        for component in &self.components {
            log::info!("Initializing component: {}", component.name());
            component.initialize().await.map_err(|e| lifecycle_error(KernelLifecyclePhase::Initialize, component.as_ref(), e))?;
        }
        for component in &self.components {
            log::info!("Starting component: {}", component.name());
            component.start().await.map_err(|e| lifecycle_error(KernelLifecyclePhase::Start, component.as_ref(), e))?;
        }

        self.running = true;
        log::info!("Application started.");
        Ok(())
    }

    /// Stop every component in reverse order
    pub async fn shutdown(&mut self) -> Result<()> {
        if !self.running {
            return Err(Error::KernelLifecycleError {
                phase: KernelLifecyclePhase::Shutdown,
                component_name: None,
                message: "Application is not running".to_string(),
                source: None,
            });
        }

        log::info!("Shutting down components...");
        for component in self.components.iter().rev() {
            log::info!("Stopping component: {}", component.name());
            if let Err(e) = component.stop().await {
                log::error!("Error stopping component {}: {}", component.name(), e);
                // Propagate the first error encountered during shutdown
                return Err(lifecycle_error(KernelLifecyclePhase::Shutdown, component.as_ref(), e));
            }
        }

        self.running = false;
        log::info!("Application shut down.");
        Ok(())
    }
}

fn lifecycle_error(phase: KernelLifecyclePhase, component: &dyn KernelComponent, source: Error) -> Error {
    Error::KernelLifecycleError {
        phase,
        component_name: Some(component.name().to_string()),
        message: format!("Component {} failed", component.name()),
        source: Some(Box::new(source)),
    }
}
