use crate::*;
use assert_cmd::prelude::*;
use blobtour::error::Result;
use blobtour::storage::StorageClient;
use predicates::prelude::*;

pub fn tests(client: &StorageClient, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        client,
        e2e_test_run_command_walks_the_lifecycle,
        e2e_test_run_keeps_progress_off_stdout,
        e2e_test_object_commands,
        e2e_test_ls_json_output,
        e2e_test_rm_missing_object_fails,
        e2e_test_missing_configuration_fails,
        e2e_test_storage_errors_carry_no_config_hint
    ));
}

async fn e2e_test_run_command_walks_the_lifecycle(client: StorageClient) -> Result<()> {
    let container = TEST_FIXTURE.new_container_name();
    let input = get_test_data_path("TextFile1.txt");
    let output = TEST_FIXTURE.new_local_path();

    blobtour_cmd()
        .arg("run")
        .arg("--container")
        .arg(&container)
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Create Container: {container}")))
        .stdout(predicate::str::contains("Deleting Object: blobtest"))
        .stdout(predicate::str::contains("Downloaded to:"));

    assert_eq!(std::fs::read(&output)?, std::fs::read(&input)?);
    let remaining = client.list_objects(&client.container(&container)?).await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "TextFile1.txt");
    Ok(())
}

async fn e2e_test_run_keeps_progress_off_stdout(_client: StorageClient) -> Result<()> {
    let container = TEST_FIXTURE.new_container_name();
    let (input, content) =
        TEST_FIXTURE.new_local_file_with_range(2 * 1024 * 1024..3 * 1024 * 1024);
    let output = TEST_FIXTURE.new_local_path();

    let result = blobtour_cmd()
        .arg("run")
        .arg("--container")
        .arg(&container)
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .output()
        .expect("run blobtour run");
    assert!(result.status.success());

    let stdout = String::from_utf8_lossy(&result.stdout);
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(!stdout.contains('%'), "progress leaked to stdout: {stdout}");
    assert!(!stdout.contains('\r'));
    assert!(stderr.contains('%'), "expected progress records on stderr");
    assert!(stdout.contains("Downloaded to:"));
    assert_eq!(std::fs::read(&output)?, content);
    Ok(())
}

async fn e2e_test_object_commands(_client: StorageClient) -> Result<()> {
    let container = TEST_FIXTURE.new_container_name();
    let (source, content) = TEST_FIXTURE.new_local_file();
    let target = TEST_FIXTURE.new_local_path();

    blobtour_cmd()
        .arg("mb")
        .arg(&container)
        .assert()
        .success()
        .stdout(predicate::str::contains("Container ready"));

    blobtour_cmd()
        .arg("put")
        .arg(&container)
        .arg(&source)
        .arg("--name")
        .arg("cli-object")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Uploaded: {} -> ",
            source.display()
        )));

    blobtour_cmd()
        .arg("ls")
        .arg(&container)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Object of length {}",
            content.len()
        )));

    blobtour_cmd()
        .arg("get")
        .arg(&container)
        .arg("cli-object")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("Downloaded to:"));
    assert_eq!(std::fs::read(&target)?, content);

    blobtour_cmd()
        .arg("rm")
        .arg(&container)
        .arg("cli-object")
        .assert()
        .success();

    blobtour_cmd()
        .arg("ls")
        .arg(&container)
        .assert()
        .success()
        .stdout(predicate::str::contains("There are no objects to list"));
    Ok(())
}

async fn e2e_test_ls_json_output(client: StorageClient) -> Result<()> {
    let container = TEST_FIXTURE.new_container(&client).await?;
    let source = get_test_data_path("TextFile1.txt");
    client.upload_object(&container, &source, None).await?;

    let output = blobtour_cmd()
        .arg("ls")
        .arg(container.name())
        .arg("--json")
        .output()
        .expect("run blobtour ls --json");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["name"], "TextFile1.txt");
    assert_eq!(
        lines[0]["size"].as_u64(),
        Some(std::fs::metadata(&source)?.len())
    );
    Ok(())
}

async fn e2e_test_rm_missing_object_fails(client: StorageClient) -> Result<()> {
    let container = TEST_FIXTURE.new_container(&client).await?;

    blobtour_cmd()
        .arg("rm")
        .arg(container.name())
        .arg("ghost")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Object 'ghost' not found"));
    Ok(())
}

async fn e2e_test_missing_configuration_fails(_client: StorageClient) -> Result<()> {
    base_cmd()
        .env("STORAGE_PROVIDER", "oss")
        .arg("ls")
        .arg("anything")
        .assert()
        .failure()
        .stderr(predicate::str::contains("STORAGE_BUCKET or OSS_BUCKET"))
        .stderr(predicate::str::contains("Hint: set STORAGE_CONNECTION_STRING"));
    Ok(())
}

async fn e2e_test_storage_errors_carry_no_config_hint(client: StorageClient) -> Result<()> {
    let container = TEST_FIXTURE.new_container(&client).await?;

    blobtour_cmd()
        .arg("get")
        .arg(container.name())
        .arg("ghost")
        .arg(TEST_FIXTURE.new_local_path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Object 'ghost' not found"))
        .stderr(predicate::str::contains("Hint:").not());
    Ok(())
}
