#![allow(dead_code)]

use std::{
    convert::Infallible,
    sync::{Arc, Mutex},
};

use wrapp_autowire::{
    Arguments, Cleanup, DiagnosticSink, DynError, Initialize, Recipe, Severity, TypeInfo,
    WireError, Wirer,
};

pub type Events = Arc<Mutex<Vec<String>>>;
pub type Reports = Arc<Mutex<Vec<(Severity, WireError)>>>;
pub type Failures = Arc<Mutex<Vec<WireError>>>;

pub fn events() -> Events {
    Arc::new(Mutex::new(Vec::new()))
}

/// Events starting with `prefix`, without the prefix
pub fn events_of(events: &Events, prefix: &str) -> Vec<String> {
    events
        .lock()
        .unwrap()
        .iter()
        .filter_map(|event| event.strip_prefix(prefix))
        .map(|rest| rest.trim().to_string())
        .collect()
}

/// Sink collecting every report
pub fn collecting_sink() -> (Reports, impl DiagnosticSink) {
    let reports: Reports = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let reports = reports.clone();
        move |severity: Severity, error: &WireError| {
            reports.lock().unwrap().push((severity, error.clone()));
        }
    };
    (reports, sink)
}

/// Wirer whose sink and exception handler record everything
pub fn recording_wirer() -> (Wirer, Reports, Failures) {
    let (reports, sink) = collecting_sink();
    let failures: Failures = Arc::new(Mutex::new(Vec::new()));

    let mut wirer = Wirer::new().with_sink(sink);
    {
        let failures = failures.clone();
        wirer.on_exception(move |error| failures.lock().unwrap().push(error));
    }

    (wirer, reports, failures)
}

/// Distinct test component per `N`, recording its lifecycle
pub struct Tracked<const N: usize> {
    pub events: Events,
}

impl<const N: usize> Initialize for Tracked<N> {
    fn initialize(&self) -> Result<(), DynError> {
        self.events.lock().unwrap().push(format!("initialize {N}"));
        Ok(())
    }
}

impl<const N: usize> Cleanup for Tracked<N> {
    fn cleanup(&self) -> Result<(), DynError> {
        self.events.lock().unwrap().push(format!("cleanup {N}"));
        Ok(())
    }
}

/// Recipe for `Tracked<N>` depending on the given parameter types
pub fn tracked<const N: usize>(events: &Events, parameters: Vec<TypeInfo>) -> Recipe<Tracked<N>> {
    let events = events.clone();
    Recipe::with_parameters(parameters, move |arguments: Arguments| {
        let events = events.clone();
        let received = arguments.remaining();
        async move {
            events
                .lock()
                .unwrap()
                .push(format!("construct {N} with {received}"));
            Ok::<_, Infallible>(Tracked::<N> { events })
        }
    })
    .contracts(|c| c.initializable().cleanable())
}

pub fn tracked_info(index: usize) -> TypeInfo {
    match index {
        0 => TypeInfo::of::<Tracked<0>>(),
        1 => TypeInfo::of::<Tracked<1>>(),
        2 => TypeInfo::of::<Tracked<2>>(),
        3 => TypeInfo::of::<Tracked<3>>(),
        4 => TypeInfo::of::<Tracked<4>>(),
        5 => TypeInfo::of::<Tracked<5>>(),
        6 => TypeInfo::of::<Tracked<6>>(),
        7 => TypeInfo::of::<Tracked<7>>(),
        _ => panic!("only 8 tracked types exist"),
    }
}

/// Registers `Tracked<index>` depending on `Tracked<d>` for every `d` in `dependencies`
pub fn register_tracked(wirer: &mut Wirer, events: &Events, index: usize, dependencies: &[usize]) {
    let parameters: Vec<TypeInfo> = dependencies.iter().copied().map(tracked_info).collect();
    match index {
        0 => wirer.add_singleton(tracked::<0>(events, parameters)),
        1 => wirer.add_singleton(tracked::<1>(events, parameters)),
        2 => wirer.add_singleton(tracked::<2>(events, parameters)),
        3 => wirer.add_singleton(tracked::<3>(events, parameters)),
        4 => wirer.add_singleton(tracked::<4>(events, parameters)),
        5 => wirer.add_singleton(tracked::<5>(events, parameters)),
        6 => wirer.add_singleton(tracked::<6>(events, parameters)),
        7 => wirer.add_singleton(tracked::<7>(events, parameters)),
        _ => panic!("only 8 tracked types exist"),
    };
}
