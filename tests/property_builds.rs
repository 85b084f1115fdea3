// tests/property_builds.rs

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use proptest::prelude::*;
use tom::engine::BuildOptions;
use tom::fs::paths::{dir_of, normalize, resolve};
use tom_test_utils::builders::SourceTreeBuilder;
use tom_test_utils::fake_executor::{product_names, FakeExecutor};

// Node i may only require products of nodes 0..i, so the graph is acyclic.
fn dag_strategy(max_nodes: usize) -> impl Strategy<Value = Vec<BTreeSet<usize>>> {
    (1..=max_nodes).prop_flat_map(|n| {
        proptest::collection::vec(proptest::collection::vec(any::<usize>(), 0..n), n).prop_map(
            |raw| {
                raw.into_iter()
                    .enumerate()
                    .map(|(i, deps)| {
                        if i == 0 {
                            BTreeSet::new()
                        } else {
                            deps.into_iter().map(|d| d % i).collect()
                        }
                    })
                    .collect()
            },
        )
    })
}

fn tree_for(deps: &[BTreeSet<usize>]) -> SourceTreeBuilder {
    let mut tree = SourceTreeBuilder::new();
    for (i, reqs) in deps.iter().enumerate() {
        let mut lines = Vec::new();
        if !reqs.is_empty() {
            let list: Vec<String> = reqs.iter().map(|d| format!("\"n{d}.o\"")).collect();
            lines.push(format!("// @requires {}", list.join(" ")));
        }
        lines.push(format!("// @produces \"n{i}.o\" true"));
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
        tree = tree.source(&format!("n{i}.c"), &lines);
    }
    tree
}

fn reachable(deps: &[BTreeSet<usize>], from: usize) -> HashSet<usize> {
    let mut seen = HashSet::new();
    let mut stack = vec![from];
    while let Some(n) = stack.pop() {
        if seen.insert(n) {
            stack.extend(deps[n].iter().copied());
        }
    }
    seen
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_reachable_product_is_built_once_after_its_requirements(
        deps in dag_strategy(8),
        jobs in 1..4usize,
        max_tasks in 1..4usize,
    ) {
        let tree = tree_for(&deps);
        let top = deps.len() - 1;

        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();

        let ran = rt.block_on(async {
            let project = tree.load().unwrap();
            let exec = FakeExecutor::new(tree.shared_fs());
            let executed = exec.executed();
            let options = BuildOptions { jobs, max_tasks, share_results: true };
            let engine = project.engine(Arc::new(exec), options);
            let report = engine.build(&format!("n{top}.o")).await.unwrap();
            prop_assert!(report.succeeded());
            prop_assert_eq!(report.built, product_names(&executed).len());
            Ok(product_names(&executed))
        })?;

        let expected = reachable(&deps, top);
        prop_assert_eq!(ran.len(), expected.len());

        let position = |i: usize| ran.iter().position(|p| *p == format!("n{i}.o"));
        for i in &expected {
            let mine = position(*i);
            prop_assert!(mine.is_some());
            for d in &deps[*i] {
                prop_assert!(position(*d) < mine);
            }
        }
    }

    #[test]
    fn resolved_literals_live_under_the_declaring_directory(
        dirs in proptest::collection::vec("[a-z]{1,6}", 0..4),
        file in "[a-z]{1,6}\\.c",
        literal in "[a-z]{1,6}(/[a-z]{1,6}){0,2}",
    ) {
        let mut declaring = PathBuf::new();
        for d in &dirs {
            declaring.push(d);
        }
        declaring.push(&file);

        let resolved = resolve(&declaring, &literal);
        prop_assert_eq!(&resolved, &normalize(&dir_of(&declaring).join(&literal)));
        if !dirs.is_empty() {
            prop_assert!(resolved.starts_with(dir_of(&declaring)));
        }
        prop_assert!(!resolved.starts_with(Path::new(".")) || resolved == Path::new("."));
    }
}
