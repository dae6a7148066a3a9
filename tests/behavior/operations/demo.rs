use crate::*;
use blobtour::demo::{self, Console, DemoPlan};
use blobtour::error::{Error, Result};
use blobtour::storage::{ContainerAccess, StorageClient};

pub fn tests(client: &StorageClient, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        client,
        test_demo_runs_the_full_sequence,
        test_demo_stops_at_first_failure
    ));
}

async fn test_demo_runs_the_full_sequence(client: StorageClient) -> Result<()> {
    let input = get_test_data_path("TextFile1.txt");
    let expected_content = std::fs::read(&input)?;
    let output = TEST_FIXTURE.new_local_path().with_file_name("TextFile2.txt");
    TEST_FIXTURE.containers.lock().unwrap().push("test-container".to_string());
    let plan = DemoPlan {
        input,
        output: output.clone(),
        ..DemoPlan::default()
    };
    let mut console = Console::new(Vec::new());

    let report = demo::run_demo(&client, &plan, &mut console).await?;

    let mut first: Vec<_> = report
        .first_listing
        .iter()
        .map(|o| (o.name.as_str(), o.size))
        .collect();
    first.sort();
    let size = expected_content.len() as u64;
    assert_eq!(first, vec![("TextFile1.txt", size), ("blobtest", size)]);

    assert_eq!(std::fs::read(&output)?, expected_content);

    assert_eq!(report.final_listing.len(), 1);
    assert_eq!(report.final_listing[0].name, "TextFile1.txt");

    let printed = String::from_utf8(console.into_inner()).unwrap();
    let steps = [
        "Create Container: test-container",
        "Uploading Object: blobtest",
        "Uploading Object: TextFile1.txt",
        "Listing Objects in test-container",
        "Downloading Object: blobtest",
        "Deleting Object: blobtest",
    ];
    let mut cursor = 0;
    for step in steps {
        let found = printed[cursor..]
            .find(step)
            .unwrap_or_else(|| panic!("missing step {step:?} in:\n{printed}"));
        cursor += found + step.len();
    }
    assert_eq!(printed.matches("Listing Objects in test-container").count(), 2);
    assert_eq!(printed.matches("Object of length").count(), 3);
    assert!(printed.contains(&format!("Downloaded to: {}", output.display())));

    Ok(())
}

async fn test_demo_stops_at_first_failure(client: StorageClient) -> Result<()> {
    let container = TEST_FIXTURE.new_container_name();
    let plan = DemoPlan {
        container: container.clone(),
        input: TEST_FIXTURE.new_local_path(),
        output: TEST_FIXTURE.new_local_path(),
        object_name: "blobtest".to_string(),
        access: ContainerAccess::Private,
    };
    let mut console = Console::new(Vec::new());

    let err = demo::run_demo(&client, &plan, &mut console)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::StepFailed { ref step, .. } if step == "Uploading Object: blobtest"
    ));
    assert!(matches!(err.root_cause(), Error::FileNotFound { .. }));

    let printed = String::from_utf8(console.into_inner()).unwrap();
    assert!(printed.contains("Uploading Object: blobtest"));
    assert!(!printed.contains("Listing Objects"));

    // The container created before the failure is left in place.
    let existing = client.container(&container)?;
    assert!(client.list_objects(&existing).await?.is_empty());
    client.operator().stat(existing.prefix()).await?;
    Ok(())
}
