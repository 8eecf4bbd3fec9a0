// Example: Mixed-Integer Programming (MIP) - 0/1 Knapsack Problem
//
// A hiker has a knapsack with capacity of 15 kg.
// There are 5 items to choose from:
//
// Item   | Weight (kg) | Value ($)
// -------|-------------|----------
// Tent   |     7       |   150
// Stove  |     3       |    90
// Food   |     4       |   120
// Water  |     5       |   100
// Camera |     2       |    80
//
// Decision Variables: x_i ∈ {0, 1} for each item (binary: take it or not)
// Maximize: 150*x₁ + 90*x₂ + 120*x₃ + 100*x₄ + 80*x₅
// Subject to: 7*x₁ + 3*x₂ + 4*x₃ + 5*x₄ + 2*x₅ ≤ 15 (weight limit)
//
// Run with `RUST_LOG=letsmip=debug` to watch every branching decision.

use letsmip::{
    Constraint, MilpProblem, ObjectiveFunction, ParallelBranchAndBound, RelaxationFactory,
    SolutionStatus, SolverConfig, SolverService, Variable,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let items = [
        ("Tent", 7.0, 150.0),
        ("Stove", 3.0, 90.0),
        ("Food", 4.0, 120.0),
        ("Water", 5.0, 100.0),
        ("Camera", 2.0, 80.0),
    ];

    let problem = MilpProblem::new(ObjectiveFunction::maximize(
        items.iter().map(|(_, _, value)| *value).collect(),
    ))
    .with_name("Knapsack Problem")
    .with_description("0/1 Knapsack with 5 items and 15 kg capacity")
    .with_variables(items.iter().map(|(name, _, _)| Variable::binary(*name)).collect())
    .add_constraint(
        Constraint::less_equal(items.iter().map(|(_, weight, _)| *weight).collect(), 15.0)
            .with_name("Weight capacity"),
    )
    .with_config(SolverConfig::default().with_threads(2).with_time_limit(60.0));

    let relaxation = RelaxationFactory::default_solver()?;
    let engine = ParallelBranchAndBound::new(relaxation);
    println!("=== Knapsack Problem (Mixed-Integer Programming) ===\n");
    println!("Using solver: {}\n", engine.name());

    let solution = engine.solve_async(&problem).await?;

    match solution.status {
        SolutionStatus::Optimal => {
            println!("✓ Optimal solution found!\n");
            println!("Items to Pack:");

            let mut total_weight = 0.0;
            for ((name, weight, value), taken) in items.iter().zip(&solution.variable_values) {
                if *taken > 0.5 {
                    println!("  ✓ {:6} - Weight: {:.1} kg, Value: ${:.0}", name, weight, value);
                    total_weight += weight;
                } else {
                    println!("  ✗ {:6} - (not selected)", name);
                }
            }

            println!("\nSummary:");
            println!("  Total Weight:  {:.1} / 15.0 kg", total_weight);
            if let Some(value) = solution.optimal_value {
                println!("  Maximum Value: ${:.0}", value);
            }

            let stats = &solution.statistics;
            println!("\nSearch Statistics:");
            println!("  Explored:    {}", stats.nodes_explored);
            println!("  Branched:    {}", stats.nodes_branched);
            println!("  Pruned:      {}", stats.nodes_pruned);
            println!("  Max depth:   {}", stats.max_depth);
            println!("  Solve Time:  {:.2} ms", stats.solve_time_ms);
        }
        SolutionStatus::Infeasible => {
            println!("✗ Problem is infeasible");
            println!("  No combination of items satisfies all constraints");
        }
        status => {
            println!("⚠ Search ended with status: {}", status);
        }
    }

    println!("\nMessage: {}", solution.message);

    Ok(())
}
