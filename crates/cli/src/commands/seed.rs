use vitrine_db::fixtures::PairSeedInfo;
use vitrine_db::DemoCatalog;

use crate::commands::{load_config, migrated_pool, runtime, CommandResult, StepFailure};

pub fn run() -> CommandResult {
    let config = match load_config("seed") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match runtime("seed") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = migrated_pool(&config).await?;

        let seed_result = DemoCatalog::load(&pool)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;
        let verification = DemoCatalog::verify(&pool)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), 6u8))?;

        let run_result: Result<SeedOutput, StepFailure> = if verification.all_present {
            Ok(SeedOutput {
                pairs: seed_result.pairs_seeded,
                products: seed_result.products_in_catalog,
            })
        } else {
            Err(("seed_verification", verification_message(&verification.checks), 6u8))
        };

        pool.close().await;
        run_result
    });

    match result {
        Ok(output) => CommandResult::success("seed", output.message()),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

struct SeedOutput {
    pairs: Vec<PairSeedInfo>,
    products: i64,
}

impl SeedOutput {
    fn message(&self) -> String {
        let pairs: Vec<String> = self
            .pairs
            .iter()
            .map(|pair| format!("  - {}: {} vs {}", pair.label, pair.left, pair.right))
            .collect();
        format!(
            "demo catalog loaded ({} products) with {} comparable pairs:\n{}",
            self.products,
            self.pairs.len(),
            pairs.join("\n")
        )
    }
}

fn verification_message(checks: &[(&'static str, bool)]) -> String {
    let failed_checks =
        checks.iter().filter_map(|(check, passed)| (!passed).then_some(*check)).collect::<Vec<_>>();
    if failed_checks.is_empty() {
        "Some demo catalog rows failed to load".to_string()
    } else {
        format!("Demo catalog verification failed for checks: {}", failed_checks.join(", "))
    }
}
