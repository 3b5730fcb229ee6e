use anyhow::Result;
use wordbeam::counters::{
    COMBINE_INPUT_RECORDS, COMBINE_OUTPUT_RECORDS, MAP_INPUT_RECORDS, MAP_OUTPUT_RECORDS,
    REDUCE_INPUT_GROUPS, REDUCE_OUTPUT_RECORDS,
};
use wordbeam::job::records_from_lines;
use wordbeam::testing::*;
use wordbeam::wordcount::word_count;
use wordbeam::*;

fn pairs(items: &[(&str, u64)]) -> Vec<(String, u64)> {
    items.iter().map(|(w, n)| (w.to_string(), *n)).collect()
}

#[test]
fn mapper_emits_words_in_line_order() {
    let emitted = WordCountMapper::default().map(&Record::new(0, "We must know"));
    assert_collections_equal(&emitted, &pairs(&[("We", 1), ("must", 1), ("know", 1)]));
}

#[test]
fn repeated_word_is_grouped_then_summed() -> Result<()> {
    let records = records_from_lines(["a a", "a"]);
    let mapper = WordCountMapper::default();

    let emitted: Vec<(String, u64)> = records.iter().flat_map(|r| mapper.map(r)).collect();
    assert_collections_equal(&emitted, &pairs(&[("a", 1), ("a", 1), ("a", 1)]));

    let p = TestPipeline::new();
    let grouped = from_vec(&p, emitted).group_by_key().collect_seq()?;
    assert_grouped_kv_equal(grouped.clone(), vec![("a".to_string(), vec![1, 1, 1])]);

    let (word, counts) = &grouped[0];
    assert_eq!(WordCountReducer.reduce(word, counts), 3);
    Ok(())
}

#[test]
fn punctuation_separates_words() -> Result<()> {
    let output = word_count_job(WordChars::Ascii).run(records_from_lines(["foo, bar! foo?"]))?;
    assert_kv_collections_equal(output.results, pairs(&[("foo", 2), ("bar", 1)]));
    Ok(())
}

#[test]
fn empty_input_produces_nothing() -> Result<()> {
    let output = word_count_job(WordChars::Ascii).run(Vec::new())?;
    assert!(output.results.is_empty());
    assert_eq!(output.counters.get(MAP_INPUT_RECORDS), Some(0));
    assert_eq!(output.counters.get(MAP_OUTPUT_RECORDS), Some(0));
    assert_eq!(output.counters.get(REDUCE_INPUT_GROUPS), Some(0));
    assert_eq!(output.counters.get(REDUCE_OUTPUT_RECORDS), Some(0));
    Ok(())
}

#[test]
fn counters_track_each_stage() -> Result<()> {
    let records = records_from_lines(["the cat", "the hat", "", "--"]);
    let output = word_count_job(WordChars::Ascii)
        .with_runner(Runner::parallel(Some(2), Some(3)))
        .run(records)?;

    assert_eq!(output.counters.get(MAP_INPUT_RECORDS), Some(4));
    assert_eq!(output.counters.get(MAP_OUTPUT_RECORDS), Some(4));
    assert_eq!(output.counters.get(REDUCE_INPUT_GROUPS), Some(3));
    assert_eq!(output.counters.get(REDUCE_OUTPUT_RECORDS), Some(3));
    assert!(output.counters.elapsed().is_some());
    Ok(())
}

#[test]
fn running_twice_gives_the_same_counts() -> Result<()> {
    let lines: Vec<String> = (0..500)
        .map(|i| format!("line {i}: alpha beta_{} gamma, alpha!", i % 7))
        .collect();
    let job = word_count_job(WordChars::Ascii);

    let first = job.run(records_from_lines(lines.clone()))?.into_sorted_results();
    let second = job.run(records_from_lines(lines))?.into_sorted_results();
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn sequential_and_parallel_jobs_agree() -> Result<()> {
    let lines: Vec<String> = (0..2_000)
        .map(|i| format!("w{} w{} shared", i % 31, i % 5))
        .collect();

    let seq = word_count_job(WordChars::Ascii)
        .with_runner(Runner::sequential())
        .run(records_from_lines(lines.clone()))?
        .into_sorted_results();
    let par = word_count_job(WordChars::Ascii)
        .with_runner(Runner::parallel(Some(4), Some(16)))
        .run(records_from_lines(lines))?
        .into_sorted_results();

    assert_eq!(seq, par);
    let shared = seq.iter().find(|(w, _)| w == "shared").map(|(_, n)| *n);
    assert_eq!(shared, Some(2_000));
    Ok(())
}

#[test]
fn unicode_words_are_opt_in() -> Result<()> {
    let lines = ["naïve café, naïve"];

    let ascii = word_count_job(WordChars::Ascii).run(records_from_lines(lines))?;
    assert_kv_collections_equal(
        ascii.results,
        pairs(&[("na", 2), ("ve", 2), ("caf", 1)]),
    );

    let unicode = word_count_job(WordChars::Unicode).run(records_from_lines(lines))?;
    assert_kv_collections_equal(unicode.results, pairs(&[("naïve", 2), ("café", 1)]));
    Ok(())
}

#[test]
fn word_count_helper_attaches_to_an_existing_pipeline() -> Result<()> {
    let p = TestPipeline::new();
    let counts = word_count(&p, vec!["x y", "y"]).collect_par_sorted(None, Some(2))?;
    assert_eq!(counts, pairs(&[("x", 1), ("y", 2)]));
    Ok(())
}

#[test]
fn counts_are_case_sensitive() -> Result<()> {
    let output = word_count_job(WordChars::Ascii).run(records_from_lines(["Word word WORD word"]))?;
    assert_kv_collections_equal(
        output.results,
        pairs(&[("WORD", 1), ("Word", 1), ("word", 2)]),
    );
    Ok(())
}

#[test]
fn combiner_does_not_change_the_counts() -> Result<()> {
    let lines: Vec<String> = (0..1_000)
        .map(|i| format!("w{} w{} the the", i % 13, i % 3))
        .collect();
    let runner = Runner::parallel(Some(3), Some(6));

    let plain = word_count_job(WordChars::Ascii)
        .with_runner(runner.clone())
        .run(records_from_lines(lines.clone()))?;
    let combined = word_count_job(WordChars::Ascii)
        .with_combiner(Sum::<u64>::new())
        .with_runner(runner)
        .run(records_from_lines(lines))?;

    assert_eq!(
        plain.clone().into_sorted_results(),
        combined.clone().into_sorted_results()
    );
    assert_eq!(plain.counters.get(COMBINE_INPUT_RECORDS), None);
    Ok(())
}

#[test]
fn combiner_counters_show_the_shrinking() -> Result<()> {
    let records = records_from_lines(["a a b", "a b b", "c"]);
    let output = word_count_job(WordChars::Ascii)
        .with_combiner(Sum::<u64>::new())
        .with_runner(Runner::sequential())
        .run(records)?;

    assert_eq!(output.counters.get(MAP_OUTPUT_RECORDS), Some(7));
    assert_eq!(output.counters.get(COMBINE_INPUT_RECORDS), Some(7));
    assert_eq!(output.counters.get(COMBINE_OUTPUT_RECORDS), Some(3));
    assert_eq!(output.counters.get(REDUCE_INPUT_GROUPS), Some(3));
    assert_kv_collections_equal(output.results, pairs(&[("a", 3), ("b", 3), ("c", 1)]));
    Ok(())
}
