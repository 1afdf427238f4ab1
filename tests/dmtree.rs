mod common;

use std::fs::File;
use std::io::BufWriter;

use dmtree::prelude::*;
use dmtree::tools::dmtree::NodeSummary;
use itertools::Itertools;

fn config() -> DmTreeConfig {
    DmTreeConfig::default()
        .with_min_sum_dmrs(5.0)
        .with_min_n_samples(2)
}

fn read_table(dir: &tempfile::TempDir) -> DmrTable {
    let path = dir.path().join("DMRs-unsupervised.tsv");
    common::write_dmr_table(BufWriter::new(File::create(&path).unwrap())).unwrap();
    DmrTableReader::default()
        .read_path(&path)
        .unwrap()
}

#[test]
fn test_end_to_end_unsupervised() -> anyhow::Result<()> {
    common::init_logger();
    let dir = tempfile::tempdir()?;
    let dmrs = read_table(&dir);
    assert_eq!(dmrs.len(), 38);
    assert_eq!(dmrs.n_groups(), 8);

    let dmtree = DmTree::try_new(config())?;
    let result = dmtree
        .cluster(&dmrs)?
        .expect("clusters expected");

    let nodes = result
        .nodes()
        .iter()
        .map(|n| (n.pattern.to_string(), n.depth, n.weight))
        .collect_vec();
    assert_eq!(
        nodes,
        vec![
            ("2|2|2|3|3|3|3|3".to_string(), 0, 15.0),
            ("0|0|0|1|1|1|2|2".to_string(), 1, 7.5),
        ]
    );
    assert_eq!(
        result.assignment().cluster_ids(),
        vec!["G0", "G0", "G0", "G1", "G1", "G1", "G2", "G2"]
    );

    let labels = result.label(&dmrs, LabelMode::Unsupervised)?;
    assert_eq!(labels[0], "P2|3|3,");
    assert_eq!(labels[20], "P0|1|2,");
    assert_eq!(labels[33], "");

    let summary: Vec<NodeSummary> = result.summary(&dmrs, LabelMode::Unsupervised)?;
    assert_eq!(summary[0].n_direct, 23);
    assert_eq!(summary[0].left, vec!["G0"]);
    assert_eq!(summary[0].right, vec!["G1", "G2"]);
    assert_eq!(summary[1].n_direct, 10);

    let names = common::sample_names();
    assert_eq!(
        result.newick(&names)?,
        "((G0_S0,G0_S1,G0_S2),((G1_S3,G1_S4,G1_S5),(G2_S6,G2_S7)):7.5):15;"
    );

    let clusters_path = dir.path().join("clusters.tsv");
    write_clusters(File::create(&clusters_path)?, result.assignment(), &names)?;
    let clusters = std::fs::read_to_string(&clusters_path)?;
    let lines = clusters.lines().collect_vec();
    assert_eq!(lines[0], "ID\tGroup\t2|3|3\t0|1|2");
    assert_eq!(lines[4], "S3\tG1\t3\t1");
    assert_eq!(lines[8], "S7\tG2\t3\t2");

    let labeled_path = dir.path().join("DMRs-labeled.tsv");
    write_labeled_dmrs(File::create(&labeled_path)?, &dmrs, &labels)?;
    let reread = DmrTableReader::default().read_path(&labeled_path)?;
    assert_eq!(reread.len(), dmrs.len());
    assert_eq!(reread.header().last().map(String::as_str), Some("DMTree"));

    let processed_path = dir.path().join("DMRs-processed.tsv");
    write_processed_dmrs(
        File::create(&processed_path)?,
        &dmrs,
        &labels,
        &names,
        LabelMode::Unsupervised,
    )?;
    let processed = DmrTableReader::default().read_path(&processed_path)?;
    assert_eq!(processed.records()[0].pattern, dmrs.records()[0].pattern);
    let header = processed.header();
    let hypo_col = header
        .iter()
        .position(|h| h == "Hypo-samples")
        .expect("Hypo-samples column");
    assert_eq!(processed.records()[0].raw[hypo_col], "S0,S1,S2");
    assert_eq!(header.last().map(String::as_str), Some("DMTree"));

    let nodes_path = dir.path().join("nodes.json");
    write_nodes_json(File::create(&nodes_path)?, result.nodes())?;
    let parsed: Vec<TreeNode> = serde_json::from_reader(File::open(&nodes_path)?)?;
    assert_eq!(parsed, result.nodes());
    Ok(())
}

#[test]
fn test_supervised_labels() -> anyhow::Result<()> {
    common::init_logger();
    let dir = tempfile::tempdir()?;
    let dmrs = read_table(&dir);
    let result = DmTree::try_new(config())?
        .cluster(&dmrs)?
        .expect("clusters expected");

    let per_cluster = DmrTable::from_records(vec![
        DmrRecord::new("chr1", 1, 100, -0.7, vec![0.1, 0.9, 0.9], "1|3|3".parse()?),
        DmrRecord::new("chr1", 200, 300, -0.7, vec![0.5, 0.1, 0.9], "2|1|3".parse()?),
        DmrRecord::new("chr1", 400, 500, 0.2, vec![0.5, 0.5, 0.5], "2|2|2".parse()?),
    ])?;
    let labels = result.label(&per_cluster, LabelMode::Supervised)?;
    assert_eq!(labels, vec!["P2|3|3,", "P0|1|2,", ""]);

    // A per-sample table does not fit the per-cluster dividers.
    assert!(result.label(&dmrs, LabelMode::Supervised).is_err());
    Ok(())
}

#[test]
fn test_unclustered_and_exhaustive() -> anyhow::Result<()> {
    common::init_logger();
    let dir = tempfile::tempdir()?;
    let dmrs = read_table(&dir);

    let strict = DmTree::try_new(config().with_min_sum_dmrs(50.0))?;
    assert!(strict.cluster(&dmrs)?.is_none());

    let tree = strict
        .exhaustive_tree(&dmrs)?
        .expect("exhaustive tree ignores the weight floor");
    assert_eq!(tree.n_nodes(), 2);
    assert!(tree.max_depth() <= dmrs.n_groups());
    Ok(())
}

#[test]
fn test_repeated_runs_are_identical() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let dmrs = read_table(&dir);
    let dmtree = DmTree::try_new(config())?;
    let first = dmtree.cluster(&dmrs)?.expect("clusters expected");
    let second = dmtree.cluster(&dmrs)?.expect("clusters expected");
    assert_eq!(first.tree(), second.tree());
    assert_eq!(first.assignment(), second.assignment());
    Ok(())
}
