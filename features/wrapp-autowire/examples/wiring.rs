use std::{
    convert::Infallible,
    sync::{Arc, Mutex},
};

use futures::executor::block_on;
use tracing_subscriber::EnvFilter;
use wrapp_autowire::{Cleanup, DynError, Initialize, Recipe, WireState, Wirer};

trait Store: Send + Sync {
    fn put(&self, key: &str, value: &str);
    fn len(&self) -> usize;
}

#[derive(Default)]
struct MemoryStore {
    entries: Mutex<Vec<(String, String)>>,
}

impl Store for MemoryStore {
    fn put(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((key.to_string(), value.to_string()));
        }
    }

    fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or_default()
    }
}

impl Cleanup for MemoryStore {
    fn cleanup(&self) -> Result<(), DynError> {
        tracing::info!("Flushing {} entries", self.len());
        Ok(())
    }
}

struct Config {
    greeting: String,
}

struct Greeter {
    config: Arc<Config>,
    store: Arc<dyn Store>,
}

impl Initialize for Greeter {
    fn initialize(&self) -> Result<(), DynError> {
        self.store.put("greeting", &self.config.greeting);
        Ok(())
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut wirer = Wirer::new();
    wirer
        .add_existing_singleton(Config {
            greeting: "hello".to_string(),
        })
        .add_singleton(
            Recipe::new(|(config, store): (Arc<Config>, Arc<dyn Store>)| async move {
                Ok::<_, Infallible>(Greeter { config, store })
            })
            .contracts(|c| c.initializable()),
        )
        .add_singleton(
            Recipe::from_fn(|()| Ok::<_, Infallible>(MemoryStore::default()))
                .contracts(|c| {
                    c.satisfies::<dyn Store>(|this| this as Arc<dyn Store>)
                        .cleanable()
                })
                .release(|store: &MemoryStore| {
                    tracing::info!("Releasing store with {} entries", store.len());
                    Ok::<_, Infallible>(())
                }),
        )
        .add_instantiation_listener(|store: Arc<dyn Store>, ()| {
            tracing::info!("Store ready with {} entries", store.len());
            Ok::<_, Infallible>(())
        })
        .on_exception(|error| tracing::error!("Wiring failed: {error}"));

    let state = block_on(wirer.wire_then(|wired| {
        tracing::info!("Wired {} instances", wired.count());
    }));

    if state == WireState::Done {
        if let Some(store) = wirer.find_instance::<dyn Store>() {
            tracing::info!("Store holds {} entries", store.len());
        }
    }

    wirer.cleanup();
}
