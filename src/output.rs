// src/output.rs
use crate::analytics::bs_analytic::{GreekSet, MarketSnapshot, Sensitivities, Valuation};
use crate::error::LabResult;
use crate::hedging::delta_hedge::HedgeRun;
use crate::market::{OptionChainRow, SmilePoint};
use ndarray::Array2;
use serde::Serialize;
use std::io::{Read, Write};

#[derive(Serialize)]
struct HedgeRecord {
    t: f64,
    spot: f64,
    option_value: f64,
    theoretical: f64,
    portfolio: f64,
    shares: f64,
    cash: f64,
}

pub fn write_hedge_run<W: Write>(writer: W, run: &HedgeRun) -> LabResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for i in 0..run.len() {
        wtr.serialize(HedgeRecord {
            t: run.times[i],
            spot: run.spots[i],
            option_value: run.option_values[i],
            theoretical: run.theoretical[i],
            portfolio: run.portfolio[i],
            shares: run.shares[i],
            cash: run.cash[i],
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// One row per time sample: `t,path_0,path_1,...`
pub fn write_paths<W: Write>(writer: W, times: &[f64], paths: &Array2<f64>) -> LabResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["t".to_string()];
    header.extend((0..paths.nrows()).map(|i| format!("path_{}", i)));
    wtr.write_record(&header)?;

    for (j, t) in times.iter().enumerate() {
        let mut record = vec![t.to_string()];
        record.extend(paths.column(j).iter().map(|s| s.to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_payoff_diagram<W: Write>(writer: W, prices: &[f64], payoffs: &[f64]) -> LabResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["asset_price", "payoff"])?;
    for (s, v) in prices.iter().zip(payoffs) {
        wtr.write_record([s.to_string(), v.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Call and put rows with the requested Greek columns
pub fn write_valuation<W: Write>(
    writer: W,
    snapshot: &MarketSnapshot,
    valuation: &Valuation,
    greeks: &Sensitivities,
    selected: GreekSet,
) -> LabResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let columns: [(GreekSet, &str); 5] = [
        (GreekSet::DELTA, "delta"),
        (GreekSet::VEGA, "vega"),
        (GreekSet::GAMMA, "gamma"),
        (GreekSet::THETA, "theta"),
        (GreekSet::RHO, "rho"),
    ];

    let mut header = vec!["option", "spot", "strike", "rate", "sigma", "tau", "price"];
    header.extend(columns.iter().filter(|(g, _)| selected.contains(*g)).map(|(_, n)| *n));
    wtr.write_record(&header)?;

    let rows = [
        (
            "call",
            valuation.call,
            [valuation.call_delta, valuation.call_vega, greeks.gamma, greeks.call_theta, greeks.call_rho],
        ),
        (
            "put",
            valuation.put,
            [valuation.put_delta, valuation.put_vega, greeks.gamma, greeks.put_theta, greeks.put_rho],
        ),
    ];

    for (name, price, values) in rows {
        let mut record = vec![
            name.to_string(),
            snapshot.spot.to_string(),
            snapshot.strike.to_string(),
            snapshot.rate.to_string(),
            snapshot.sigma.to_string(),
            snapshot.tau.to_string(),
            price.to_string(),
        ];
        record.extend(
            columns
                .iter()
                .zip(values)
                .filter(|((g, _), _)| selected.contains(*g))
                .map(|(_, v)| v.to_string()),
        );
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_smile<W: Write>(writer: W, smile: &[SmilePoint]) -> LabResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for point in smile {
        wtr.serialize(point)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Parse option chain rows from CSV with a header line
pub fn read_option_chain<R: Read>(reader: R) -> LabResult<Vec<OptionChainRow>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let rows = rdr
        .deserialize()
        .collect::<Result<Vec<OptionChainRow>, csv::Error>>()?;
    Ok(rows)
}
