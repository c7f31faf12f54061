// benchagg - Benchmark log aggregation toolkit
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn benchagg_cmd() -> Command {
    Command::cargo_bin("benchagg").expect("Failed to find benchagg binary")
}

fn write_file(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write input file");
    path.to_string_lossy().into_owned()
}

const METRIC_LOG: &str = "\
Running skiplist benchmark
metric: put, malloc: jemalloc, threads: 1, total_throughput: 1000000, avg_throughput: 1000000
metric: put, malloc: tcmalloc, threads: 1, total_throughput: 2000000, avg_throughput: 2000000
metric: get, malloc: jemalloc, threads: 1, total_throughput: 9, avg_throughput: 9
metric: put, malloc: jemalloc, threads: 4, total_throughput: 3000000, avg_throughput: 3000000
metric: put, malloc: jemalloc, threads: 4, total_throughput: 5000000, avg_throughput: 5000000
metric: put, malloc: tcmalloc, threads: 4, total_throughput: 6000000, avg_throughput: 6000000
done
";

fn block(threads: u32, throughput: u32) -> String {
    format!(
        "Running art put\nmetric: put, #threads: {threads}, total throughput: 1, avg throughput: {throughput}\n1.5,0.25,50%,2048,100,7\n----\n"
    )
}

// ===== Help and Version Tests =====

#[test]
fn test_help_output() {
    benchagg_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("benchmark log aggregation toolkit"))
        .stdout(predicate::str::contains("aggregate"))
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("average"));
}

#[test]
fn test_no_subcommand_fails() {
    benchagg_cmd().assert().failure();
}

// ===== Aggregate Command Tests =====

#[test]
fn test_aggregate_writes_csv_and_chart() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "skiplist.out.1", METRIC_LOG);
    let results = dir.path().join("results");

    benchagg_cmd()
        .args(["aggregate", &input, "skiplist", "--result-dir"])
        .arg(&results)
        .assert()
        .success()
        .stdout(predicate::str::contains("skiplist_res.csv"));

    let csv = fs::read_to_string(results.join("skiplist_res.csv")).unwrap();
    assert_eq!(csv, "threads,jemalloc,tcmalloc\n1,1000000,2000000\n4,4000000,6000000\n");

    let svg = fs::read_to_string(results.join("skiplist_res.svg")).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("skiplist puts performance"));
}

#[test]
fn test_aggregate_rerun_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "skiplist.log", METRIC_LOG);
    let csv_path = dir.path().join("skiplist_res.csv");

    let mut outputs = Vec::new();
    for _ in 0..2 {
        benchagg_cmd()
            .args(["aggregate", &input, "-r"])
            .arg(dir.path())
            .assert()
            .success();
        outputs.push(fs::read(&csv_path).unwrap());
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn test_aggregate_without_data_structure_skips_chart() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "hashmap.log", METRIC_LOG);

    benchagg_cmd()
        .args(["aggregate", &input, "-r"])
        .arg(dir.path())
        .assert()
        .success();

    assert!(dir.path().join("hashmap_res.csv").exists());
    assert!(!dir.path().join("hashmap_res.svg").exists());
}

#[test]
fn test_aggregate_no_chart_flag() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "hashmap.log", METRIC_LOG);

    benchagg_cmd()
        .args(["aggregate", &input, "hashmap", "--no-chart", "--result_dir"])
        .arg(dir.path())
        .assert()
        .success();

    assert!(!dir.path().join("hashmap_res.svg").exists());
}

#[test]
fn test_aggregate_two_letter_result_dir_flag() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "skiplist.out.1", METRIC_LOG);

    benchagg_cmd()
        .current_dir(dir.path())
        .args(["aggregate", &input, "skiplist", "-rd", "out"])
        .assert()
        .success();

    assert!(dir.path().join("out").join("skiplist_res.csv").exists());
    assert!(dir.path().join("out").join("skiplist_res.svg").exists());
    assert!(!dir.path().join("d").exists());
}

#[test]
fn test_aggregate_csv_format_flags() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "skiplist.log", METRIC_LOG);

    benchagg_cmd()
        .args(["aggregate", &input, "--delimiter", ";", "--no-header", "-r"])
        .arg(dir.path())
        .assert()
        .success();

    let csv = fs::read_to_string(dir.path().join("skiplist_res.csv")).unwrap();
    assert_eq!(csv, "1;1000000;2000000\n4;4000000;6000000\n");
}

#[test]
fn test_aggregate_non_ascii_delimiter() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "skiplist.log", METRIC_LOG);

    benchagg_cmd()
        .args(["aggregate", &input, "--delimiter", "§", "-r"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an ASCII character"));

    assert!(!dir.path().join("skiplist_res.csv").exists());
}

#[test]
fn test_aggregate_chart_failure_leaves_no_csv() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "skiplist.log", METRIC_LOG);
    let results = dir.path().join("results");
    fs::create_dir_all(results.join("skiplist_res.svg")).unwrap();

    benchagg_cmd()
        .args(["aggregate", &input, "skiplist", "-r"])
        .arg(&results)
        .assert()
        .failure()
        .stderr(predicate::str::contains("skiplist_res.svg"));

    let names: Vec<String> = fs::read_dir(&results)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["skiplist_res.svg"]);
}

#[test]
fn test_aggregate_non_finite_throughput() {
    let dir = TempDir::new().unwrap();
    let log = "metric: put, malloc: jemalloc, threads: 1, avg_throughput: nan\n";
    let input = write_file(dir.path(), "nan.log", log);

    benchagg_cmd()
        .args(["aggregate", &input, "-r"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("avg_throughput"));

    assert!(!dir.path().join("nan_res.csv").exists());
}

#[test]
fn test_aggregate_mean_out_of_range() {
    let dir = TempDir::new().unwrap();
    let log = "metric: put, malloc: jemalloc, threads: 1, avg_throughput: 1e300\n";
    let input = write_file(dir.path(), "huge.log", log);

    benchagg_cmd()
        .args(["aggregate", &input, "-r"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Out of range"));

    assert!(!dir.path().join("huge_res.csv").exists());
}

#[test]
fn test_aggregate_metric_prefix() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "gets.log", METRIC_LOG);

    benchagg_cmd()
        .args(["aggregate", &input, "--metric-prefix", "get", "-r"])
        .arg(dir.path())
        .assert()
        .success();

    let csv = fs::read_to_string(dir.path().join("gets_res.csv")).unwrap();
    assert_eq!(csv, "threads,jemalloc\n1,9\n");
}

#[test]
fn test_aggregate_missing_key_is_an_error() {
    let dir = TempDir::new().unwrap();
    let log = "\
metric: put, malloc: jemalloc, threads: 1, avg_throughput: 10
metric: put, malloc: tcmalloc, threads: 1, avg_throughput: 20
metric: put, malloc: jemalloc, threads: 2, avg_throughput: 30
";
    let input = write_file(dir.path(), "gap.log", log);
    let results = dir.path().join("out");

    benchagg_cmd()
        .args(["aggregate", &input, "gap", "-r"])
        .arg(&results)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("tcmalloc"));

    assert!(!results.exists());
}

#[test]
fn test_aggregate_missing_zero() {
    let dir = TempDir::new().unwrap();
    let log = "\
metric: put, malloc: jemalloc, threads: 1, avg_throughput: 10
metric: put, malloc: tcmalloc, threads: 1, avg_throughput: 20
metric: put, malloc: jemalloc, threads: 2, avg_throughput: 30
";
    let input = write_file(dir.path(), "gap.log", log);

    benchagg_cmd()
        .args(["aggregate", &input, "--missing", "zero", "-r"])
        .arg(dir.path())
        .assert()
        .success();

    let csv = fs::read_to_string(dir.path().join("gap_res.csv")).unwrap();
    assert_eq!(csv, "threads,jemalloc,tcmalloc\n1,10,20\n2,30,0\n");
}

#[test]
fn test_aggregate_no_qualifying_lines() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "empty.log", "nothing to see\n");

    benchagg_cmd()
        .args(["aggregate", &input, "-r"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Data format error"));

    assert!(!dir.path().join("empty_res.csv").exists());
}

#[test]
fn test_aggregate_malformed_throughput() {
    let dir = TempDir::new().unwrap();
    let log = "metric: put, malloc: jemalloc, threads: 1, avg_throughput: fast\n";
    let input = write_file(dir.path(), "bad.log", log);

    benchagg_cmd()
        .args(["aggregate", &input, "-r"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 1"));
}

#[test]
fn test_aggregate_missing_input() {
    benchagg_cmd()
        .args(["aggregate", "/nonexistent/benchagg.log"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("I/O error"));
}

#[test]
fn test_aggregate_respects_size_limit() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "big.log", METRIC_LOG);

    benchagg_cmd()
        .env("BENCHAGG_MAX_FILE_SIZE", "16")
        .args(["aggregate", &input, "-r"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("too large"));
}

// ===== Extract Command Tests =====

#[test]
fn test_extract_block_log() {
    let dir = TempDir::new().unwrap();
    let log = [block(1, 100), block(4, 400)].concat();
    let input = write_file(dir.path(), "art-put-jemalloc.out.1", &log);

    benchagg_cmd()
        .args(["extract", &input, "-r"])
        .arg(dir.path().join("csv"))
        .assert()
        .success();

    let csv =
        fs::read_to_string(dir.path().join("csv").join("art-put-jemalloc.out.1.csv")).unwrap();
    assert_eq!(
        csv,
        "n_threads,throughput,usertime,systemtime,cpuusage,max_rss,minor_pf,voluntary_ctx_switch\n\
         1,100,1.5,0.25,0.5,2048,100,7\n\
         4,400,1.5,0.25,0.5,2048,100,7\n"
    );
}

#[test]
fn test_extract_strict_blocks() {
    let dir = TempDir::new().unwrap();
    let log = format!("{}trailing\n", block(1, 100));
    let input = write_file(dir.path(), "partial.out", &log);

    benchagg_cmd()
        .args(["extract", &input, "-r"])
        .arg(dir.path())
        .assert()
        .success();

    benchagg_cmd()
        .args(["extract", &input, "--strict-blocks", "-r"])
        .arg(dir.path().join("strict"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("trailing block"));
}

// ===== Average Command Tests =====

#[test]
fn test_average_block_logs_to_stdout() {
    let dir = TempDir::new().unwrap();
    let inputs: Vec<String> = [100, 200, 300]
        .iter()
        .enumerate()
        .map(|(run, throughput)| {
            let log = [block(1, *throughput), block(8, throughput * 2)].concat();
            write_file(dir.path(), &format!("run.out.{}", run + 1), &log)
        })
        .collect();

    benchagg_cmd()
        .arg("average")
        .args(&inputs)
        .assert()
        .success()
        .stdout(predicate::str::contains("1,200,1.5,0.25,0.5,2048,100,7\n"))
        .stdout(predicate::str::contains("8,400,1.5,0.25,0.5,2048,100,7\n"));
}

#[test]
fn test_average_extracted_csv_files() {
    let dir = TempDir::new().unwrap();
    let header = "n_threads,throughput,usertime,systemtime,cpuusage,max_rss,minor_pf,voluntary_ctx_switch\n";
    let a = write_file(dir.path(), "a.csv", &format!("{header}2,10,1,1,1,1,1,1\n"));
    let b = write_file(dir.path(), "b.csv", &format!("{header}2,30,3,3,3,3,3,3\n"));
    let output = dir.path().join("avg.csv");

    benchagg_cmd()
        .args(["average", &a, &b, "-o"])
        .arg(&output)
        .assert()
        .success();

    let csv = fs::read_to_string(&output).unwrap();
    assert_eq!(csv, format!("{header}2,20,2,2,2,2,2,2\n"));
}

#[test]
fn test_average_tab_delimited_without_header() {
    let dir = TempDir::new().unwrap();
    let a = write_file(dir.path(), "a.out", &block(4, 100));
    let b = write_file(dir.path(), "b.out", &block(4, 300));

    benchagg_cmd()
        .args(["average", &a, &b, "--delimiter", "\t", "--no-header"])
        .assert()
        .success()
        .stdout("4\t200\t1.5\t0.25\t0.5\t2048\t100\t7\n");
}

#[test]
fn test_average_shape_mismatch() {
    let dir = TempDir::new().unwrap();
    let a = write_file(dir.path(), "a.out", &[block(1, 1), block(2, 2)].concat());
    let b = write_file(dir.path(), "b.out", &block(1, 1));

    benchagg_cmd()
        .args(["average", &a, &b])
        .assert()
        .failure()
        .stderr(predicate::str::contains("b.out"));
}

#[test]
fn test_average_requires_inputs() {
    benchagg_cmd().arg("average").assert().failure();
}
