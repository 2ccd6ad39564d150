use log::{info, warn};
use std::sync::Arc;

use crate::aggregation::{platform_overview, PlatformOverview};
use crate::configuration::config::Config;
use crate::configuration::types::StorageBackend;
use crate::error_handling::types::*;
use crate::seeding::{SeedGenerator, SeedOptions, SeedReport, StdRandom};
use crate::storage::{CollectionStorage, DatabaseStorage, FileStorage, MemoryStorage, Store};
use crate::web_interface::WebServer;

/// Wires configuration, storage, seeding and the web API together.
///
/// The controller holds the store for the whole process lifetime. Backends
/// that own their own runtime must not be dropped from async code, so the
/// store is only ever released here, after any server runtime is gone.
pub struct Controller {
    pub config: Config,
    store: Arc<Store>,
}

impl Controller {
    /// Opens the configured storage backend.
    pub fn new(config: Config) -> Result<Self, ControllerError> {
        info!("Opening {:?} storage", config.storage.backend);
        let backend = open_backend(&config)?;
        Ok(Self {
            config,
            store: Arc::new(Store::new(backend)),
        })
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Seeds the store unless seeding is disabled.
    pub fn seed(&self) -> Result<Option<SeedReport>, ControllerError> {
        if !self.config.seed.enabled {
            info!("Seeding disabled by configuration");
            return Ok(None);
        }
        let rng = match self.config.seed.rng_seed {
            Some(seed) => StdRandom::seeded(seed),
            None => StdRandom::from_entropy(),
        };
        let options = SeedOptions {
            demo_users: self.config.seed.demo_users,
        };
        let report = SeedGenerator::new(&self.store, rng).with_options(options).run()?;
        Ok(Some(report))
    }

    pub fn overview(&self) -> Result<PlatformOverview, ControllerError> {
        Ok(platform_overview(&self.store)?)
    }

    /// Seeds, then serves the web API if enabled. Blocks until the server stops.
    pub fn run(&self) -> Result<(), ControllerError> {
        self.seed()?;
        if !self.config.web.enabled {
            warn!("Web API disabled, nothing left to do");
            return Ok(());
        }
        let addr = self.config.web_address()?;
        let runtime = tokio::runtime::Runtime::new()?;
        let server = WebServer::new(self.store.clone());
        let outcome = runtime.block_on(server.start(addr));
        drop(server);
        runtime.shutdown_background();
        Ok(outcome?)
    }
}

fn open_backend(config: &Config) -> Result<Arc<dyn CollectionStorage>, ControllerError> {
    let path = config.storage.path.as_ref();
    let backend: Arc<dyn CollectionStorage> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        StorageBackend::File => match path {
            Some(p) => Arc::new(FileStorage::new(p)?),
            None => Arc::new(FileStorage::new_default()?),
        },
        StorageBackend::Database => match path {
            Some(p) => Arc::new(DatabaseStorage::new_file(p)?),
            None => Arc::new(DatabaseStorage::new()?),
        },
    };
    Ok(backend)
}
