//! Output formatting for the vthlab CLI.

use vthlab_core::TraceSet;
use vthlab_extract::VthResult;

/// Print the Vgs/Id curve of the analyzed step in tabular form.
pub fn print_curve(result: &VthResult) {
    println!("{:>14}{:>16}", "Vgs (V)", "Id (A)");
    println!("{}", "-".repeat(30));
    for (vgs, id) in result.vgs_volts.iter().zip(result.id_amps.iter()) {
        println!("{:>14.6}{:>16.6e}", vgs, id);
    }
    println!();
}

/// Print every trace with its kind and shape.
pub fn print_traces(traces: &TraceSet) {
    println!("{:>4}  {:<24}{:>10}{:>8}{:>8}", "#", "Name", "Kind", "Steps", "Points");
    println!("{}", "-".repeat(56));
    for (i, trace) in traces.iter().enumerate() {
        println!(
            "{:>4}  {:<24}{:>10}{:>8}{:>8}",
            i,
            trace.name(),
            trace.kind(),
            trace.num_steps(),
            trace.num_points()
        );
    }
    println!();
}
