//! Signals observed by host worker threads while the console runs.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::{
    CommandSeparator, CommandTable, Dispatcher, EventSignal, EventSpec, InteractiveLoop, LoopExit,
    ManagedObjects, Signal,
};

const PATIENCE: Duration = Duration::from_secs(5);

fn dispatcher(stop: &Signal, graph: &Signal) -> Dispatcher {
    let table = CommandTable::build(
        Vec::new(),
        vec![
            EventSpec::stop(["q"], stop.clone()),
            EventSpec::new("graph", ["g"], graph.clone()),
        ],
        CommandSeparator::Hyphen,
    )
    .expect("build table");
    Dispatcher::new(table, ManagedObjects::new())
}

#[test]
fn worker_wakes_on_stop_command() {
    let (stop, graph) = (Signal::new(), Signal::new());
    let console = dispatcher(&stop, &graph);
    let ticks = Arc::new(AtomicUsize::new(0));

    let worker = {
        let (halt, counter) = (stop.clone(), Arc::clone(&ticks));
        thread::spawn(move || {
            while !halt.wait_timeout(Duration::from_millis(5)) {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        })
    };

    let mut repl = InteractiveLoop::new(&console, Cursor::new("g\nq\n"), Vec::new());
    assert_eq!(repl.run().expect("run loop"), LoopExit::StopCommand);
    worker.join().expect("worker exits after stop");
    assert!(graph.is_set());
}

#[test]
fn stop_from_another_thread_ends_console() {
    let (stop, graph) = (Signal::new(), Signal::new());
    let console = dispatcher(&stop, &graph);

    let stopper = {
        let (halt, trigger) = (stop.clone(), graph.clone());
        thread::spawn(move || {
            assert!(trigger.wait_timeout(PATIENCE), "graph event never arrived");
            halt.set();
        })
    };

    // The worker stops the console once it sees the graph event; the loop
    // notices at its next prompt and never reads the trailing line.
    let mut repl = InteractiveLoop::new(&console, Cursor::new("g\n"), Vec::new());
    assert_eq!(repl.step().expect("first step"), None);
    stopper.join().expect("stopper thread");
    assert_eq!(repl.step().expect("second step"), Some(LoopExit::StopSignalled));
}
