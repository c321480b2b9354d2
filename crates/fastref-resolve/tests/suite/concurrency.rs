use fastref_core::FqName;
use fastref_resolve::{ClassResolver, FileContext, ReferenceFacts, TargetSpec, Verdict};
use fastref_syntax::{find_type_references, parse_header};
use rayon::prelude::*;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn resolver_is_shareable() {
    assert_send_sync::<ClassResolver>();
    assert_send_sync::<FileContext>();
    assert_send_sync::<ReferenceFacts>();
}

fn source_for(i: usize) -> String {
    let imports = match i % 4 {
        0 => "import org.junit.Test\n",
        1 => "import org.testng.Test\n",
        2 => "import org.junit.*\nimport org.testng.*\n",
        _ => "",
    };
    format!("package gen.p{i}\n\n{imports}\nclass C{i} {{\n    @Test fun t() {{}}\n}}\n")
}

fn expected_for(i: usize) -> Verdict {
    match i % 4 {
        0 => Verdict::Match,
        2 => Verdict::Indeterminate,
        _ => Verdict::NoMatch,
    }
}

#[test]
fn parallel_queries_agree_with_sequential_ones() {
    let mut resolver = ClassResolver::new(TargetSpec::parse("org.junit.Test").unwrap());
    resolver.add_conflict(FqName::parse("org.testng.Test").unwrap());
    let resolver = resolver;

    let sources: Vec<String> = (0..256).map(source_for).collect();

    let verdicts: Vec<Verdict> = sources
        .par_iter()
        .flat_map_iter(|source| {
            let file = FileContext::from_header(&parse_header(source));
            let names = resolver.candidate_names(&file);
            find_type_references(source, &names)
                .into_iter()
                .map(|occurrence| {
                    let facts = ReferenceFacts::try_from(&occurrence).unwrap();
                    resolver.resolve(&file, &facts)
                })
                .collect::<Vec<_>>()
        })
        .collect();

    let expected: Vec<Verdict> = (0..sources.len()).map(expected_for).collect();
    assert_eq!(verdicts, expected);

    let stats = resolver.stats();
    assert_eq!(stats.attempts, 256);
    assert_eq!(stats.matches, 64);
    assert_eq!(stats.no_matches, 128);
    assert_eq!(stats.indeterminate, 64);
}
