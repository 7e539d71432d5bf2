use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use shockflow::{compressibility, isentropic, shock, ConicalShockSolver, ShockBranch};
use std::error::Error;

#[derive(Parser)]
#[command(name = "shockflow")]
#[command(version = "0.1.0")]
#[command(about = "Compressible-flow relations and conical-shock solver", long_about = None)]
struct Cli {
    /// Specific heat ratio of the gas
    #[arg(long, global = true, default_value_t = 1.4)]
    gamma: f64,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = Output::Table)]
    output: Output,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum Output {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum Branch {
    Weak,
    Strong,
}

impl From<Branch> for ShockBranch {
    fn from(branch: Branch) -> Self {
        match branch {
            Branch::Weak => ShockBranch::Weak,
            Branch::Strong => ShockBranch::Strong,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Normal-shock jump properties for an upstream Mach number
    Normal {
        /// Upstream Mach number
        #[arg(short, long)]
        mach: f64,
    },

    /// Oblique-shock angle and downstream state for a flow deflection
    Oblique {
        /// Upstream Mach number
        #[arg(short, long)]
        mach: f64,

        /// Flow deflection angle (degrees)
        #[arg(short, long)]
        theta: f64,

        /// Shock solution branch
        #[arg(long, value_enum, default_value_t = Branch::Weak)]
        branch: Branch,
    },

    /// Conical-shock (Taylor-Maccoll) solve
    Cone {
        /// Upstream Mach number
        #[arg(short, long)]
        mach: f64,

        /// Shock angle (degrees); forward solve for the cone angle
        #[arg(long, conflicts_with = "cone_angle")]
        shock_angle: Option<f64>,

        /// Cone half-angle (degrees); inverse solve for the shock angle
        #[arg(long)]
        cone_angle: Option<f64>,

        /// Shock solution branch for the inverse solve
        #[arg(long, value_enum, default_value_t = Branch::Weak)]
        branch: Branch,
    },

    /// Isentropic stagnation ratios for a Mach number
    Isentropic {
        /// Local Mach number
        #[arg(short, long)]
        mach: f64,
    },

    /// Critical Mach number for a minimum incompressible Cp
    CriticalMach {
        /// Minimum incompressible pressure coefficient
        #[arg(long)]
        cp0_min: f64,
    },
}

#[derive(Serialize)]
struct NormalShockReport {
    m1: f64,
    m2: f64,
    p2_p1: f64,
    t2_t1: f64,
    rho2_rho1: f64,
    pt2_pt1: f64,
    pitot_pt2_p1: f64,
    cp_max: f64,
}

#[derive(Serialize)]
struct ObliqueShockReport {
    m1: f64,
    theta_deg: f64,
    beta_deg: f64,
    m2: f64,
    p2_p1: f64,
    pt2_pt1: f64,
}

#[derive(Serialize)]
struct ConeReport {
    m1: f64,
    shock_angle_deg: f64,
    cone_angle_deg: f64,
    surface_mach: f64,
    pt_ratio: f64,
}

#[derive(Serialize)]
struct IsentropicReport {
    mach: f64,
    tt_t: f64,
    pt_p: f64,
    rhot_rho: f64,
    a_astar: f64,
}

fn print_report<T: Serialize>(
    output: Output,
    report: &T,
    table: String,
) -> Result<(), serde_json::Error> {
    match output {
        Output::Json => println!("{}", serde_json::to_string_pretty(report)?),
        Output::Table => print!("{table}"),
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let gam = cli.gamma;

    match cli.command {
        Commands::Normal { mach } => {
            let report = NormalShockReport {
                m1: mach,
                m2: shock::normal_shock_mach(mach, gam)?,
                p2_p1: shock::normal_shock_pressure_ratio(mach, gam)?,
                t2_t1: shock::normal_shock_temperature_ratio(mach, gam)?,
                rho2_rho1: shock::normal_shock_density_ratio(mach, gam)?,
                pt2_pt1: shock::normal_shock_stagnation_pressure_ratio(mach, gam)?,
                pitot_pt2_p1: shock::normal_shock_pitot_ratio(mach, gam)?,
                cp_max: shock::normal_shock_cp_max(mach, gam)?,
            };
            let table = format!(
                "Normal shock at M1 = {:.4}\n\
                 \x20 M2        = {:.5}\n\
                 \x20 p2/p1     = {:.5}\n\
                 \x20 T2/T1     = {:.5}\n\
                 \x20 rho2/rho1 = {:.5}\n\
                 \x20 PT2/PT1   = {:.5}\n\
                 \x20 PT2/p1    = {:.5}\n\
                 \x20 Cp,max    = {:.5}\n",
                report.m1,
                report.m2,
                report.p2_p1,
                report.t2_t1,
                report.rho2_rho1,
                report.pt2_pt1,
                report.pitot_pt2_p1,
                report.cp_max,
            );
            print_report(cli.output, &report, table)?;
        }

        Commands::Oblique {
            mach,
            theta,
            branch,
        } => {
            let theta_rad = theta.to_radians();
            let beta = shock::oblique_beta(mach, theta_rad, gam, 1e-9, branch.into())?;
            let mn1 = shock::oblique_normal_mach(mach, beta)?;
            let mn2 = shock::normal_shock_mach(mn1, gam)?;
            let report = ObliqueShockReport {
                m1: mach,
                theta_deg: theta,
                beta_deg: beta.to_degrees(),
                m2: shock::oblique_downstream_mach(mn2, beta, theta_rad),
                p2_p1: shock::normal_shock_pressure_ratio(mn1, gam)?,
                pt2_pt1: shock::total_pressure_ratio_across(mn1, mn2, gam)?,
            };
            let table = format!(
                "Oblique shock at M1 = {:.4}, theta = {:.3} deg ({:?})\n\
                 \x20 beta    = {:.4} deg\n\
                 \x20 M2      = {:.5}\n\
                 \x20 p2/p1   = {:.5}\n\
                 \x20 PT2/PT1 = {:.5}\n",
                report.m1, report.theta_deg, branch, report.beta_deg, report.m2, report.p2_p1,
                report.pt2_pt1,
            );
            print_report(cli.output, &report, table)?;
        }

        Commands::Cone {
            mach,
            shock_angle,
            cone_angle,
            branch,
        } => {
            let mut solver = ConicalShockSolver::with_gamma(gam)?;
            let theta_shock = match (shock_angle, cone_angle) {
                (Some(deg), _) => deg.to_radians(),
                (None, Some(deg)) => solver.shock_angle(mach, deg.to_radians(), branch.into())?,
                (None, None) => {
                    return Err("either --shock-angle or --cone-angle is required".into())
                }
            };
            let solution = solver.solve(mach, theta_shock)?;
            let report = ConeReport {
                m1: mach,
                shock_angle_deg: theta_shock.to_degrees(),
                cone_angle_deg: solution.theta_cone.to_degrees(),
                surface_mach: solution.surface_mach,
                pt_ratio: solution.pt_ratio,
            };
            let table = format!(
                "Conical shock at M1 = {:.4}\n\
                 \x20 shock angle = {:.4} deg\n\
                 \x20 cone angle  = {:.4} deg\n\
                 \x20 Mc          = {:.5}\n\
                 \x20 PTc/PT0     = {:.5}\n",
                report.m1,
                report.shock_angle_deg,
                report.cone_angle_deg,
                report.surface_mach,
                report.pt_ratio,
            );
            print_report(cli.output, &report, table)?;
        }

        Commands::Isentropic { mach } => {
            let report = IsentropicReport {
                mach,
                tt_t: isentropic::stagnation_temperature_ratio(mach, gam),
                pt_p: isentropic::stagnation_pressure_ratio(mach, gam),
                rhot_rho: isentropic::stagnation_density_ratio(mach, gam),
                a_astar: isentropic::area_ratio(mach, gam),
            };
            let table = format!(
                "Isentropic flow at M = {:.4}\n\
                 \x20 TT/T     = {:.5}\n\
                 \x20 PT/P     = {:.5}\n\
                 \x20 rhoT/rho = {:.5}\n\
                 \x20 A/A*     = {:.5}\n",
                report.mach, report.tt_t, report.pt_p, report.rhot_rho, report.a_astar,
            );
            print_report(cli.output, &report, table)?;
        }

        Commands::CriticalMach { cp0_min } => {
            let mcr = compressibility::critical_mach(cp0_min, gam, 1e-6)?;
            if cli.output == Output::Json {
                println!("{}", serde_json::json!({ "cp0_min": cp0_min, "mcr": mcr }));
            } else {
                println!("Critical Mach number for Cp0,min = {cp0_min}: Mcr = {mcr:.5}");
            }
        }
    }

    Ok(())
}
