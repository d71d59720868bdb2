//! Adaptive indicator bank
//!
//! Computes RSI, MACD, Bollinger Bands and the Stochastic oscillator with
//! periods chosen by the current market regime.

use tracing::debug;

use crate::indicators::momentum::{
    calculate_macd_series, calculate_rsi_series, calculate_stochastic_series,
};
use crate::indicators::regime::{AdaptivePeriods, BaseParameters, MarketRegime};
use crate::indicators::trend::{TrendClassifier, TrendState};
use crate::indicators::volatility::{
    calculate_bollinger_series, VolatilityEstimator, VolatilityScore,
};
use crate::models::indicators::{
    BollingerSeries, Candle, MacdSeries, RsiSeries, StochasticSeries,
};

/// Market context shared by every indicator in one evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct MarketContext {
    pub volatility: VolatilityScore,
    pub trend: TrendState,
    pub regime: MarketRegime,
    pub periods: AdaptivePeriods,
}

/// All adaptive indicator series for one window
#[derive(Debug, Clone)]
pub struct IndicatorReadings {
    pub context: MarketContext,
    pub rsi: RsiSeries,
    pub macd: MacdSeries,
    pub bollinger: BollingerSeries,
    pub stochastic: StochasticSeries,
}

#[derive(Debug, Clone, Default)]
pub struct AdaptiveIndicatorBank {
    volatility: VolatilityEstimator,
    trend: TrendClassifier,
    base: BaseParameters,
}

impl AdaptiveIndicatorBank {
    pub fn new(volatility: VolatilityEstimator, trend: TrendClassifier, base: BaseParameters) -> Self {
        Self {
            volatility,
            trend,
            base,
        }
    }

    pub fn volatility_estimator(&self) -> &VolatilityEstimator {
        &self.volatility
    }

    pub fn trend_classifier(&self) -> &TrendClassifier {
        &self.trend
    }

    /// Estimate volatility and trend once and pick the regime's periods
    pub fn context(&self, candles: &[Candle]) -> MarketContext {
        let volatility = self.volatility.estimate(candles);
        let trend = self.trend.classify(candles);
        let regime = MarketRegime::classify(trend, volatility);
        let periods = AdaptivePeriods::for_regime(regime, &self.base);

        debug!(
            volatility = volatility.value(),
            trend = trend.value(),
            regime = ?regime,
            "AdaptiveIndicatorBank: market context"
        );

        MarketContext {
            volatility,
            trend,
            regime,
            periods,
        }
    }

    pub fn rsi(&self, candles: &[Candle], periods: &AdaptivePeriods) -> RsiSeries {
        calculate_rsi_series(candles, periods.rsi)
    }

    pub fn macd(&self, candles: &[Candle], periods: &AdaptivePeriods) -> MacdSeries {
        calculate_macd_series(
            candles,
            periods.macd_fast,
            periods.macd_slow,
            periods.macd_signal,
        )
    }

    pub fn bollinger(&self, candles: &[Candle], periods: &AdaptivePeriods) -> BollingerSeries {
        calculate_bollinger_series(candles, periods.bollinger_period, periods.bollinger_std_dev)
    }

    pub fn stochastic(&self, candles: &[Candle], periods: &AdaptivePeriods) -> StochasticSeries {
        calculate_stochastic_series(
            candles,
            periods.stochastic_k,
            periods.stochastic_slow_k,
            periods.stochastic_d,
        )
    }

    /// Compute every indicator under a single regime decision
    pub fn compute(&self, candles: &[Candle]) -> IndicatorReadings {
        let context = self.context(candles);
        let periods = &context.periods;

        IndicatorReadings {
            rsi: self.rsi(candles, periods),
            macd: self.macd(candles, periods),
            bollinger: self.bollinger(candles, periods),
            stochastic: self.stochastic(candles, periods),
            context,
        }
    }
}
