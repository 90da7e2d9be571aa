//! simtime-probe: headless driver for the simulation-time subsystem.
//!
//! Usage:
//!   simtime-probe --config run.json --time 123456
//!   simtime-probe --precision -12 --units -9 --time 5000
//!   simtime-probe --config run.json --ipc-mode

use anyhow::Result;
use simtime_core::{
    config::{parse_precision_directive, RunConfig, ScopeConfig},
    types::units_name,
    Handle, ScopeId, SimKernel, SimTime, Value, ValueFormat,
};
use std::env;
use std::io::{self, BufRead, Write};

const STRING_FORMATS: [ValueFormat; 4] = [
    ValueFormat::BinStr,
    ValueFormat::OctStr,
    ValueFormat::DecStr,
    ValueFormat::HexStr,
];

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    AdvanceTo {
        time: SimTime,
    },
    Read {
        scope: String,
        format: ValueFormat,
        #[serde(default)]
        unscaled: bool,
    },
    Quit,
}

#[derive(serde::Serialize)]
struct ScopeReport {
    scope: String,
    units: Option<String>,
    time: Value,
    simtime: Value,
    strings: Vec<Value>,
}

#[derive(serde::Serialize)]
struct ProbeState {
    current_time: SimTime,
    precision: Option<String>,
    scopes: Vec<ScopeReport>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let time = parse_arg(&args, "--time", 0u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let config = load_config(&args)?;

    let mut kernel = SimKernel::from_config(&config)?;
    kernel.advance_to(time)?;

    if ipc_mode {
        run_ipc_loop(&mut kernel)?;
    } else {
        print_summary(&mut kernel)?;
    }
    Ok(())
}

/// A config file wins; otherwise build a single `top` scope from flags.
fn load_config(args: &[String]) -> Result<RunConfig> {
    if let Some(path) = flag_value(args, "--config") {
        return RunConfig::load(path);
    }
    let precision = match flag_value(args, "--directive") {
        Some(line) => Some(parse_precision_directive(line)?),
        None => flag_value(args, "--precision")
            .map(|p| p.parse::<i32>())
            .transpose()?,
    };
    let units = parse_arg(args, "--units", precision.unwrap_or(0));
    Ok(RunConfig {
        precision,
        scopes: vec![ScopeConfig {
            name: "top".into(),
            parent: None,
            units,
        }],
    })
}

fn run_ipc_loop(kernel: &mut SimKernel) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Bad command {:?}: {e}", buffer.trim_end());
                write_error(&mut stdout, &e)?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => {
                let state = build_state(kernel)?;
                writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
            }
            IpcCommand::AdvanceTo { time } => match kernel.advance_to(time) {
                Ok(now) => writeln!(stdout, "{}", serde_json::json!({ "current_time": now }))?,
                Err(e) => write_error(&mut stdout, &e)?,
            },
            IpcCommand::Read { scope, format, unscaled } => {
                match read_scope(kernel, &scope, format, unscaled) {
                    Ok(value) => writeln!(stdout, "{}", serde_json::to_string(&value)?)?,
                    Err(e) => write_error(&mut stdout, &e)?,
                }
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn read_scope(
    kernel: &mut SimKernel,
    scope: &str,
    format: ValueFormat,
    unscaled: bool,
) -> Result<Value> {
    let id = kernel
        .scopes()
        .find(scope)
        .ok_or_else(|| anyhow::anyhow!("Unknown scope: {scope}"))?;
    let handle = scope_handle(kernel, id, unscaled)?;
    Ok(kernel.get_value(handle, format)?)
}

fn scope_handle(kernel: &mut SimKernel, id: ScopeId, unscaled: bool) -> Result<Handle> {
    let handle = if unscaled {
        kernel.bind_sim_time(id)?
    } else {
        kernel.time_var(id)?
    };
    Ok(handle)
}

fn build_state(kernel: &mut SimKernel) -> Result<ProbeState> {
    let ids: Vec<ScopeId> = kernel.scopes().iter().map(|(id, _)| id).collect();
    let mut scopes = Vec::with_capacity(ids.len());
    for id in ids {
        let time_var = scope_handle(kernel, id, false)?;
        let sim_time = scope_handle(kernel, id, true)?;
        let strings = STRING_FORMATS
            .iter()
            .map(|f| kernel.get_value(time_var, *f))
            .collect::<Result<Vec<_>, _>>()?;
        scopes.push(ScopeReport {
            scope: kernel.scopes().full_name(id).unwrap_or_default(),
            units: units_name(kernel.scope(id)?.time_units),
            time: kernel.get_value(time_var, ValueFormat::Time)?,
            simtime: kernel.get_value(sim_time, ValueFormat::Time)?,
            strings,
        });
    }
    Ok(ProbeState {
        current_time: kernel.current_time(),
        precision: units_name(kernel.get_precision()),
        scopes,
    })
}

fn print_summary(kernel: &mut SimKernel) -> Result<()> {
    let state = build_state(kernel)?;

    println!("=== SIMULATION TIME ===");
    println!("  current time:   {}", state.current_time);
    println!(
        "  precision:      {}",
        state.precision.as_deref().unwrap_or("(non-standard)")
    );
    for report in &state.scopes {
        println!();
        println!(
            "  [{}] units {}",
            report.scope,
            report.units.as_deref().unwrap_or("(non-standard)")
        );
        if let Some(t) = report.time.as_time() {
            println!("    $time:        high={} low={}", t.high, t.low);
        }
        if let Some(t) = report.simtime.as_time() {
            println!("    $simtime:     high={} low={}", t.high, t.low);
        }
        for value in &report.strings {
            println!(
                "    {:<13} {}",
                format!("{:?}:", value.format()),
                value.as_str().unwrap_or_default()
            );
        }
    }
    Ok(())
}

fn write_error(out: &mut impl Write, e: &dyn std::fmt::Display) -> Result<()> {
    let err_json = serde_json::json!({ "error": e.to_string() });
    writeln!(out, "{}", err_json)?;
    out.flush()?;
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
