use color_eyre::Result;
use tfplan_core::builder::{effectively_equal, NO_CHANGES};
use tfplan_core::{build_forest, ChangeType, Forest, NodeId, NodeKind};
use tfplan_tests::{child_texts, fixture, fixture_forest, init_tracing, root_texts, FIXTURES};

fn siblings(forest: &Forest, id: NodeId) -> Vec<NodeId> {
    match forest.node(id).parent() {
        Some(parent) => forest.node(parent).children().to_vec(),
        None => forest.roots().to_vec(),
    }
}

/// `Plan: X to add, Y to change, Z to destroy ...` split into its counts.
fn summary_counts(line: &str) -> (usize, usize, usize) {
    let numbers: Vec<usize> = line
        .split(|c: char| !c.is_ascii_digit())
        .filter(|part| !part.is_empty())
        .filter_map(|part| part.parse().ok())
        .collect();
    (numbers[0], numbers[1], numbers[2])
}

#[tokio::test]
async fn test_single_create() -> Result<()> {
    init_tracing();
    let forest = fixture_forest("create.json").await?;

    assert_eq!(
        root_texts(&forest),
        [
            "# random_pet.name will be created",
            "Plan: 1 to add, 0 to change, 0 to destroy",
        ]
    );
    let header = forest.roots()[0];
    assert_eq!(
        child_texts(&forest, header),
        ["+ resource \"random_pet\" \"name\" {", "}"]
    );
    let block = forest.node(header).children()[0];
    assert_eq!(child_texts(&forest, block), ["+ name = \"x\""]);
    assert_eq!(forest.node(block).change_type, ChangeType::Create);
    Ok(())
}

#[tokio::test]
async fn test_replace_with_reason() -> Result<()> {
    init_tracing();
    let forest = fixture_forest("replace.json").await?;

    let header = forest.node(forest.roots()[0]);
    assert_eq!(
        header.text,
        "# aws_instance.db will be replaced (tainted, so must be replaced)"
    );
    assert_eq!(header.change_type, ChangeType::Replace);
    assert_eq!(header.action_reason.as_deref(), Some("replace_because_tainted"));

    let block = header.children()[0];
    assert_eq!(
        forest.node(block).text,
        "-/+ resource \"aws_instance\" \"db\" {"
    );
    assert_eq!(
        child_texts(&forest, block),
        [
            "~ ami = \"ami-1\" -> \"ami-2\"",
            "~ id = \"i-123\" -> (known after apply)",
        ]
    );
    assert_eq!(
        forest.node(forest.roots()[1]).text,
        "Plan: 1 to add, 0 to change, 1 to destroy"
    );
    Ok(())
}

#[tokio::test]
async fn test_drift_comes_first() -> Result<()> {
    init_tracing();
    let forest = fixture_forest("drift.json").await?;
    let roots = forest.roots();

    let drifted = forest.node(roots[0]);
    assert!(drifted.is_drifted);
    assert_eq!(drifted.change_type, ChangeType::Drift);
    assert_eq!(drifted.text, "# aws_s3_bucket.logs has drifted (update)");
    assert_eq!(forest.node(roots[1]).kind, NodeKind::Separator);

    let planned = forest.node(roots[2]);
    assert!(!planned.is_drifted);
    assert_eq!(planned.text, "# aws_instance.app will be updated");
    assert_eq!(
        forest.node(*roots.last().unwrap()).text,
        "Plan: 0 to add, 1 to change, 0 to destroy (1 drifted)"
    );
    Ok(())
}

#[tokio::test]
async fn test_moved_resources_sort_last() -> Result<()> {
    init_tracing();
    let forest = fixture_forest("moved.json").await?;

    assert_eq!(
        root_texts(&forest),
        [
            "# aws_vpc.zzz will be created",
            "# aws_lb.front will be updated (moved from aws_lb.legacy)",
            "Plan: 1 to add, 1 to change, 0 to destroy (1 moved)",
        ]
    );
    let moved = forest.node(forest.roots()[1]);
    assert_eq!(moved.previous_address.as_deref(), Some("aws_lb.legacy"));
    Ok(())
}

#[tokio::test]
async fn test_mixed_plan_root_order() -> Result<()> {
    init_tracing();
    let forest = fixture_forest("mixed.json").await?;

    assert_eq!(
        root_texts(&forest),
        [
            "# aws_s3_bucket.logs has drifted (update)",
            "",
            "# aws_db_instance.main will be replaced (cannot be updated in-place)",
            "# aws_iam_role.old will be destroyed (no resource configuration found)",
            "# aws_instance.web will be updated",
            "# aws_security_group.api will be created",
            "# aws_ssm_parameter.cfg will be updated",
            "# data.aws_ami.ubuntu will be read (configuration contains unknown values)",
            "# aws_lb.front will be updated (moved from aws_lb.legacy)",
            "Plan: 2 to add, 3 to change, 2 to destroy (1 moved) (1 drifted)",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_nested_update_hides_unchanged() -> Result<()> {
    init_tracing();
    let forest = fixture_forest("mixed.json").await?;
    let web = forest
        .roots()
        .iter()
        .copied()
        .find(|&id| forest.node(id).text.starts_with("# aws_instance.web"))
        .expect("web instance root");
    let block = forest.node(web).children()[0];

    assert_eq!(
        child_texts(&forest, block),
        [
            "~ ami = \"ami-0a1b2c3d\" -> \"ami-9f8e7d6c\"",
            "~ ebs_block_device[1] {",
            "}",
            "+ public_ip = (known after apply)",
            "~ security_groups = [",
            "]",
            "~ tags {",
            "}",
            "# (3 unchanged attributes hidden)",
            "# (1 unchanged block hidden)",
        ]
    );

    let ebs = forest.node(block).children()[1];
    assert_eq!(
        child_texts(&forest, ebs),
        [
            "~ volume_size = 20 -> 40",
            "# (1 unchanged attribute hidden)",
        ]
    );
    let groups = forest.node(block).children()[4];
    assert_eq!(
        child_texts(&forest, groups),
        ["~ \"sg-2\" -> \"sg-3\",", "# (1 unchanged element hidden)"]
    );
    Ok(())
}

#[tokio::test]
async fn test_null_representation_only_update() -> Result<()> {
    init_tracing();
    let forest = fixture_forest("mixed.json").await?;
    let cfg = forest
        .roots()
        .iter()
        .copied()
        .find(|&id| forest.node(id).text.starts_with("# aws_ssm_parameter.cfg"))
        .expect("ssm parameter root");

    assert_eq!(forest.node(cfg).change_type, ChangeType::Update);
    let block = forest.node(forest.node(cfg).children()[0]);
    assert_eq!(block.change_type, ChangeType::NoOp);
    assert_eq!(
        child_texts(&forest, forest.node(cfg).children()[0]),
        [
            "# (all attributes unchanged; only null representation differs)",
            "# (2 unchanged attributes hidden)",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_build_is_deterministic() -> Result<()> {
    init_tracing();
    for name in FIXTURES {
        let text = fixture(name).await?;
        assert_eq!(build_forest(&text), build_forest(&text), "{name} differs between builds");
    }
    Ok(())
}

#[tokio::test]
async fn test_every_block_is_closed() -> Result<()> {
    init_tracing();
    for name in FIXTURES {
        let forest = fixture_forest(name).await?;
        let mut blocks = 0;
        let mut closers = 0;
        for (id, node) in forest.iter() {
            match node.kind {
                NodeKind::Block => {
                    blocks += 1;
                    let peers = siblings(&forest, id);
                    let at = peers.iter().position(|&p| p == id).expect("listed in parent");
                    let next = peers.get(at + 1).map(|&p| forest.node(p));
                    let next = next.unwrap_or_else(|| panic!("{name}: {} has no closer", node.text));
                    assert_eq!(next.kind, NodeKind::ClosingBrace, "{name}: {}", node.text);
                    assert_eq!(next.depth, node.depth, "{name}: closer depth for {}", node.text);
                    let expected = if node.text.ends_with('[') { "]" } else { "}" };
                    assert_eq!(next.text, expected, "{name}: closer for {}", node.text);
                }
                NodeKind::ClosingBrace => closers += 1,
                _ => {}
            }
        }
        assert_eq!(blocks, closers, "{name}: unbalanced braces");
    }
    Ok(())
}

#[tokio::test]
async fn test_summary_matches_headers() -> Result<()> {
    init_tracing();
    for name in FIXTURES {
        let forest = fixture_forest(name).await?;
        let (mut creates, mut updates, mut destroys, mut replaces) = (0, 0, 0, 0);
        for &id in forest.roots() {
            let node = forest.node(id);
            if node.kind != NodeKind::Resource || node.is_drifted {
                continue;
            }
            match node.change_type {
                ChangeType::Create => creates += 1,
                ChangeType::Update => updates += 1,
                ChangeType::Destroy => destroys += 1,
                ChangeType::Replace => replaces += 1,
                _ => {}
            }
        }
        let summary = forest.node(*forest.roots().last().unwrap());
        assert_eq!(summary.kind, NodeKind::Summary);
        let (add, change, destroy) = summary_counts(&summary.text);
        assert_eq!(add, creates + replaces, "{name}: add count");
        assert_eq!(change, updates, "{name}: change count");
        assert_eq!(destroy, destroys + replaces, "{name}: destroy count");
    }
    Ok(())
}

#[tokio::test]
async fn test_effectively_equal_values_never_show() -> Result<()> {
    init_tracing();
    let pairs = [
        ("null", "\"\""),
        ("{}", "[]"),
        ("null", "{}"),
        ("\"\"", "[]"),
    ];
    for (before, after) in pairs {
        let b: serde_json::Value = serde_json::from_str(before)?;
        let a: serde_json::Value = serde_json::from_str(after)?;
        assert!(effectively_equal(&b, &a), "{before} vs {after}");

        let plan = format!(
            r#"{{"resource_changes":[{{"address":"t.n","type":"t","name":"n",
                "change":{{"actions":["update"],"before":{{"k":{before},"m":1}},
                "after":{{"k":{after},"m":2}}}}}}]}}"#
        );
        let mut forest = build_forest(&plan);
        forest.expand_all();
        let lines: Vec<&str> = forest.iter().map(|(_, n)| n.text.as_str()).collect();
        assert!(
            !lines.iter().any(|line| line.contains(" k ")),
            "{before} -> {after} surfaced: {lines:?}"
        );
        assert!(lines.contains(&"~ m = 1 -> 2"));
        assert!(
            lines.contains(&"# (1 unchanged attribute hidden)"),
            "{before} -> {after} not tallied as an attribute: {lines:?}"
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_empty_and_malformed_input() -> Result<()> {
    init_tracing();
    let empty = build_forest(r#"{"resource_changes":[],"resource_drift":[]}"#);
    assert_eq!(root_texts(&empty), [NO_CHANGES]);

    let broken = build_forest("{\"resource_changes\": [");
    assert_eq!(broken.len(), 1);
    let node = broken.node(broken.roots()[0]);
    assert_eq!(node.kind, NodeKind::Error);
    assert!(node.text.starts_with("Error: invalid plan JSON"), "{}", node.text);
    Ok(())
}
