use std::{error::Error, fs, path::Path};

use tracing::info;
use tracing_subscriber::EnvFilter;

use dfr_reference_element::{initialization, io::write_to_csv::write_nodes_to_csv};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let params = initialization::initialize_params_by_file("inputs/elementparam.json")?;
    let dfr = initialization::initialize_dfr(&params)?;
    let element = initialization::initialize_lagrange_element(&params)?;
    let cubature = initialization::initialize_cubature(&params)?;
    info!(
        solution_points = dfr.solution_element.np,
        flux_points = dfr.flux_element.np,
        edge_points = dfr.flux_element.np_edge,
        "DFR element pair ready"
    );
    info!(
        nodes = element.np,
        nodes_per_edge = element.nfp(),
        cubature_order = cubature.order,
        cubature_points = cubature.len(),
        "Lagrange element ready"
    );

    // sanity check: divergence of (x, y) is 2 everywhere
    let e = &dfr.solution_element;
    let div = dfr.divergence(e.r.view(), e.s.view())?;
    let max_error = div.iter().fold(0.0_f64, |acc, d| acc.max((d - 2.0).abs()));
    info!(max_error, "divergence of (r, s)");

    if let Some(output_file) = &params.output_file {
        if let Some(parent) = Path::new(output_file).parent() {
            fs::create_dir_all(parent)?;
        }
        write_nodes_to_csv(&dfr.flux_element, output_file)?;
        info!("wrote flux nodes to {output_file}");
    }
    Ok(())
}
