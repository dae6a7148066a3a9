use crate::*;
use blobtour::error::Result;
use blobtour::storage::StorageClient;
use std::collections::HashMap;

pub fn tests(client: &StorageClient, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        client,
        test_list_empty_container,
        test_list_reports_names_and_sizes,
        test_list_skips_prefix_entries,
        test_list_is_scoped_to_container,
        test_list_reflects_current_state
    ));
}

async fn test_list_empty_container(client: StorageClient) -> Result<()> {
    let container = TEST_FIXTURE.new_container(&client).await?;

    let objects = client.list_objects(&container).await?;

    assert!(objects.is_empty(), "expected no objects, got {objects:?}");
    Ok(())
}

async fn test_list_reports_names_and_sizes(client: StorageClient) -> Result<()> {
    let container = TEST_FIXTURE.new_container(&client).await?;
    let mut expected = HashMap::new();
    for i in 0..5 {
        let (path, content) = TEST_FIXTURE.new_local_file();
        let name = format!("object-{i}");
        client.upload_object(&container, &path, Some(&name)).await?;
        expected.insert(name, content.len() as u64);
    }

    let objects = client.list_objects(&container).await?;

    let listed: HashMap<String, u64> = objects
        .iter()
        .map(|o| (o.name.clone(), o.size))
        .collect();
    assert_eq!(expected, listed);
    for object in &objects {
        assert_eq!(object.address, container.address(&object.name));
    }
    Ok(())
}

async fn test_list_skips_prefix_entries(client: StorageClient) -> Result<()> {
    let container = TEST_FIXTURE.new_container(&client).await?;
    let nested_dir = format!("{}nested/", container.prefix());
    client.operator().create_dir(&nested_dir).await?;
    client
        .operator()
        .write(&format!("{nested_dir}inner.bin"), vec![7u8; 10])
        .await?;

    let objects = client.list_objects(&container).await?;

    assert_eq!(objects.len(), 1, "only the nested object is listed: {objects:?}");
    assert_eq!(objects[0].name, "nested/inner.bin");
    assert_eq!(objects[0].size, 10);
    Ok(())
}

async fn test_list_is_scoped_to_container(client: StorageClient) -> Result<()> {
    let first = TEST_FIXTURE.new_container(&client).await?;
    let second = TEST_FIXTURE.new_container(&client).await?;
    let (path, _) = TEST_FIXTURE.new_local_file();
    client.upload_object(&first, &path, Some("only-here")).await?;

    assert_eq!(client.list_objects(&first).await?.len(), 1);
    assert!(client.list_objects(&second).await?.is_empty());
    Ok(())
}

async fn test_list_reflects_current_state(client: StorageClient) -> Result<()> {
    let container = TEST_FIXTURE.new_container(&client).await?;
    let (path, _) = TEST_FIXTURE.new_local_file();

    assert!(client.list_objects(&container).await?.is_empty());
    client.upload_object(&container, &path, Some("late")).await?;
    let objects = client.list_objects(&container).await?;

    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].name, "late");
    Ok(())
}
