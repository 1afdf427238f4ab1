use std::io::Write;

/// Three true groups over eight samples: {0,1,2}, {3,4,5} and {6,7}.
///
/// - 20 DMRs hypo in the first group against the rest,
/// - 10 DMRs separating {3,4,5} (hypo) from {6,7},
/// - 3 DMRs like the first kind but with a small difference,
/// - 5 one-sided DMRs.
pub fn write_dmr_table<W: Write>(mut sink: W) -> std::io::Result<()> {
    writeln!(
        sink,
        "chr\tstart\tend\tq-value\tmeandiff\t#CpGs\tp (MWU)\tp (2D KS)\tmean\tsig.comparison"
    )?;
    let mut start = 1000;
    let mut row = |sink: &mut W, meandiff: f64, mean: &str, sig: &str| {
        start += 1000;
        writeln!(
            sink,
            "chr1\t{}\t{}\t0.001\t{}\t12\t0.0001\t0.001\t{}\t{}",
            start,
            start + 400,
            meandiff,
            mean,
            sig
        )
    };
    for i in 0..20 {
        let meandiff = if i % 2 == 0 { 0.75 } else { -0.75 };
        row(
            &mut sink,
            meandiff,
            "0.1|0.1|0.1|0.9|0.9|0.9|0.9|0.9",
            "1|1|1|3|3|3|3|3",
        )?;
    }
    for _ in 0..10 {
        row(
            &mut sink,
            -0.75,
            "0.5|0.5|0.5|0.1|0.1|0.1|0.9|0.9",
            "2|2|2|1|1|1|3|3",
        )?;
    }
    for _ in 0..3 {
        row(
            &mut sink,
            0.3,
            "0.3|0.3|0.3|0.6|0.6|0.6|0.6|0.6",
            "1|1|1|3|3|3|3|3",
        )?;
    }
    for _ in 0..5 {
        row(
            &mut sink,
            0.8,
            "0.1|0.5|0.5|0.5|0.5|0.5|0.5|0.9",
            "1|2|2|2|2|2|2|3",
        )?;
    }
    // Not settled by the segmentation step.
    row(
        &mut sink,
        0.9,
        "0.1|0.1|0.1|0.9|0.9|0.9|0.9|0.9",
        "TBC",
    )?;
    Ok(())
}

pub fn sample_names() -> Vec<String> {
    (0..8).map(|i| format!("S{}", i)).collect()
}

pub fn init_logger() {
    let _ = pretty_env_logger::try_init();
}
