/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Distributed square-matrix multiplication driver.
//!
//! Spawns an in-process mesh of workers, multiplies two seeded random
//! matrices with Cannon's algorithm, and optionally prints the matrices or
//! verifies the result against the sequential reference.

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use tracing::info;

use cannon::{BlockLayout, Coordinator, ProcessGrid};
use cannon_comm::{Communicator, LocalMesh};
use cannon_tools::render::render_matrix;
use cannon_utils::{random_matrix, reference, SquareMatrix};

#[derive(Parser, Debug)]
#[command(name = "cannon-multiply")]
#[command(about = "Multiply two random square matrices across a grid of workers")]
struct Cli {
    /// Matrix dimension n; must be divisible by the square root of the
    /// worker count
    dim: usize,

    /// Number of workers; must be a perfect square
    #[arg(short, long, default_value_t = 4)]
    workers: usize,

    /// Seed for the random input matrices
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Print the input and result matrices
    #[arg(long)]
    print: bool,

    /// Check the result against a sequential multiply
    #[arg(long)]
    verify: bool,
}

fn run(cli: Cli) -> Result<()> {
    // Both checks happen before any worker is spawned, so a bad
    // configuration never leaves part of a mesh waiting on a collective.
    let grid = ProcessGrid::new(cli.workers)?;
    BlockLayout::new(cli.dim, grid.side())?;

    let dim = cli.dim;
    let seed = cli.seed;
    let a = random_matrix::<i32>(dim, seed).context("allocating matrix A")?;
    let b = random_matrix::<i32>(dim, seed + 1).context("allocating matrix B")?;

    if cli.print {
        print!("Matrix A:\n{}", render_matrix(&a));
        print!("Matrix B:\n{}", render_matrix(&b));
    }

    info!(dim, workers = cli.workers, seed, "launching worker mesh");
    let results = LocalMesh::run(cli.workers, move |endpoint| {
        // The root regenerates the operands from the shared seed instead of
        // having them shipped into every worker closure.
        let operands = (endpoint.rank() == 0).then(|| {
            (
                random_matrix::<i32>(dim, seed).expect("operand allocation"),
                random_matrix::<i32>(dim, seed + 1).expect("operand allocation"),
            )
        });
        Coordinator::new(endpoint).multiply(operands)
    })?;

    let mut root_result: Option<SquareMatrix<i32>> = None;
    for (rank, result) in results.into_iter().enumerate() {
        let result = result.with_context(|| format!("worker {rank} failed"))?;
        if rank == 0 {
            root_result = result;
        }
    }
    let c = root_result.ok_or_else(|| anyhow!("root worker produced no result"))?;

    if cli.print {
        print!("Matrix C (Result):\n{}", render_matrix(&c));
    }

    if cli.verify {
        let expected = reference::multiply(&a, &b).context("sequential verification")?;
        if c != expected {
            bail!("distributed result does not match the sequential multiply");
        }
        info!("verification passed");
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Usage and parse failures exit with status 1, printed once.
            let _ = err.print();
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
