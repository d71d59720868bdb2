use adaptrix::config::EngineConfig;
use adaptrix::models::{Candle, ExternalPrediction, PriceWindow, SignalDirection, SignalEvaluation};
use adaptrix::signals::SignalEngine;

/// Oscillating uptrend with a short pullback at the end
fn synthetic_window(bars: usize) -> Vec<Candle> {
    (0..bars)
        .map(|i| {
            let t = i as f64;
            let base = 100.0 + t * 0.4 + (t / 3.0).sin() * 2.0;
            let close = if i + 5 >= bars { base - 3.0 } else { base };
            let open = close - 0.3;
            Candle::new(open, open.max(close) + 1.0, open.min(close) - 1.0, close, 1_000.0 + t * 10.0)
        })
        .collect()
}

fn print_evaluation(label: &str, evaluation: &SignalEvaluation) {
    let signal = &evaluation.signal;
    println!("{label}:");
    println!("  Direction: {}", signal.direction);
    println!("  Confidence: {:.2}", signal.confidence);
    println!("  Reason: {}", signal.reason);
    println!("  Price: {:.2}", signal.current_price);
    match (signal.stop_loss, signal.take_profit) {
        (Some(stop), Some(target)) => println!("  Stop: {stop:.2}  Target: {target:.2}"),
        _ => println!("  Stop/Target: none"),
    }
    if let Some(snapshot) = &signal.indicators {
        println!("  Regime: {:?}  Votes: {}", snapshot.regime, snapshot.votes);
    }
    println!("  ML contribution: {:.2}", signal.ml_contribution);
    println!(
        "  Position size: {:.4}  R:R {:.2}",
        evaluation.position.size, evaluation.position.risk_reward_ratio
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig::default();
    config.validate()?;
    let engine = SignalEngine::from_config(&config);

    let window = PriceWindow::new(synthetic_window(120))?;

    let indicator_only = engine.evaluate(&window, None);
    print_evaluation("Indicators only", &indicator_only);
    println!();

    let prediction =
        ExternalPrediction::new(SignalDirection::Long, 0.85).with_volatility_levels(&window);
    let fused = engine.evaluate(&window, Some(&prediction));
    print_evaluation("Fused with long prediction (0.85)", &fused);
    println!();

    let contrary = ExternalPrediction::from_probability(0.1)?.with_volatility_levels(&window);
    let disagreement = engine.evaluate(&window, Some(&contrary));
    print_evaluation("Fused with short prediction (0.90)", &disagreement);

    Ok(())
}
