//! In-process convergence harness: a fixed set of replicas, each owning one
//! counter, gossip full-state snapshots over a broadcast channel and must all
//! settle on the same value. Snapshots travel as MessagePack buffers, so each
//! replica only ever merges a decoded point-in-time copy of a peer, never a
//! live reference.

use anyhow::{anyhow, Context, Result};
use pncounter::{PNCounter, ReplicaId};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};

const REPLICA_COUNT: usize = 5;
const ROUNDS: usize = 4;

/// One gossip frame: the sender's index plus its full serialized state.
#[derive(Clone)]
struct Frame {
    origin: usize,
    snapshot: Vec<u8>,
}

async fn run_replica(
    replica: usize,
    tx: broadcast::Sender<Frame>,
    mut rx: broadcast::Receiver<Frame>,
    done: mpsc::Sender<PNCounter>,
) -> Result<()> {
    let mut counter = PNCounter::new(ReplicaId::from(replica), REPLICA_COUNT)?;

    for round in 0..=ROUNDS {
        // Deterministic per-replica workload; the final round only gossips,
        // so every replica ends up merging everyone's settled state.
        if round < ROUNDS {
            for _ in 0..(replica + 1) {
                counter.increment()?;
            }
            if replica % 2 == 1 {
                counter.decrement()?;
            }
        }

        let buf = rmp_serde::to_vec(&counter).context("encode snapshot")?;
        tx.send(Frame {
            origin: replica,
            snapshot: buf,
        })
        .map_err(|_| anyhow!("gossip channel closed"))?;

        let mut merged = 0;
        while merged < REPLICA_COUNT - 1 {
            let frame = rx.recv().await.context("receive snapshot")?;
            if frame.origin == replica {
                continue;
            }
            let snapshot: PNCounter =
                rmp_serde::from_slice(&frame.snapshot).context("decode snapshot")?;
            counter.merge(&snapshot)?;
            merged += 1;
        }

        debug!(replica, round, value = counter.value(), "round complete");
    }

    info!(replica, value = counter.value(), "replica settled");
    done.send(counter).await.context("report final state")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let (tx, _) = broadcast::channel(REPLICA_COUNT * (ROUNDS + 1) + 1);
    let (done_tx, mut done_rx) = mpsc::channel(REPLICA_COUNT);

    // Subscribe every replica before any of them starts sending, so no frame
    // is missed.
    let receivers: Vec<_> = (0..REPLICA_COUNT).map(|_| tx.subscribe()).collect();
    let mut handles = Vec::new();
    for (replica, rx) in receivers.into_iter().enumerate() {
        handles.push(tokio::spawn(run_replica(
            replica,
            tx.clone(),
            rx,
            done_tx.clone(),
        )));
    }
    drop(done_tx);

    let mut observer = PNCounter::new(ReplicaId::from(0), REPLICA_COUNT)?;
    let mut values = Vec::new();
    while let Some(state) = done_rx.recv().await {
        values.push(state.value());
        observer.merge(&state)?;
    }
    for handle in handles {
        handle.await??;
    }

    let expected = observer.value();
    if values.iter().any(|&v| v != expected) {
        return Err(anyhow!(
            "replicas diverged: saw {:?}, join of all states is {}",
            values,
            expected
        ));
    }

    info!(
        replicas = REPLICA_COUNT,
        rounds = ROUNDS,
        value = expected,
        "all replicas converged"
    );
    Ok(())
}
