mod common;

use common::{seed, try_connect};
use jobly::{Company, CompanyFilter, Job, JoblyResult, NewCompany, UpdatePayload};

fn handles(companies: &[Company]) -> Vec<&str> {
    companies.iter().map(|c| c.handle.as_str()).collect()
}

#[tokio::test]
async fn create_rejects_duplicate_handle() -> JoblyResult<()> {
    let Some(mut client) = try_connect("create_rejects_duplicate_handle").await else {
        return Ok(());
    };
    let tx = client.transaction().await?;
    seed(&tx).await?;

    let new = NewCompany {
        handle: "new".into(),
        name: "New".into(),
        description: "New Description".into(),
        num_employees: Some(1),
        logo_url: None,
    };
    let created = Company::create(&tx, &new).await?;
    assert_eq!(created.handle, "new");
    assert_eq!(created.logo_url, None);

    let err = Company::create(&tx, &new).await.unwrap_err();
    assert!(err.is_malformed_request());

    tx.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn find_all_filters_by_name_and_size() -> JoblyResult<()> {
    let Some(mut client) = try_connect("find_all_filters_by_name_and_size").await else {
        return Ok(());
    };
    let tx = client.transaction().await?;
    seed(&tx).await?;

    let all = Company::find_all(&tx, &CompanyFilter::new()).await?;
    assert_eq!(handles(&all), vec!["c1", "c2", "c3"]);

    let by_name = Company::find_all(&tx, &CompanyFilter::new().name("c2")).await?;
    assert_eq!(handles(&by_name), vec!["c2"]);

    let by_size = Company::find_all(&tx, &CompanyFilter::new().min_employees(2).max_employees(3)).await?;
    assert_eq!(handles(&by_size), vec!["c2", "c3"]);

    let err = Company::find_all(&tx, &CompanyFilter::new().min_employees(3).max_employees(1))
        .await
        .unwrap_err();
    assert!(err.is_malformed_request());

    tx.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn get_includes_jobs() -> JoblyResult<()> {
    let Some(mut client) = try_connect("get_includes_jobs").await else {
        return Ok(());
    };
    let tx = client.transaction().await?;
    let ids = seed(&tx).await?;

    let detail = Company::get(&tx, "c1").await?;
    assert_eq!(detail.company.name, "C1");
    assert_eq!(
        detail.jobs.iter().map(|j| j.id).collect::<Vec<_>>(),
        vec![ids[0], ids[1]]
    );

    assert!(Company::get(&tx, "nope").await.unwrap_err().is_not_found());

    tx.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn update_translates_field_names() -> JoblyResult<()> {
    let Some(mut client) = try_connect("update_translates_field_names").await else {
        return Ok(());
    };
    let tx = client.transaction().await?;
    seed(&tx).await?;

    let payload: UpdatePayload = serde_json::from_str(
        r#"{"name": "C1 Renamed", "numEmployees": 10, "logoUrl": null}"#,
    )
    .unwrap();
    let company = Company::update(&tx, "c1", &payload).await?;
    assert_eq!(company.name, "C1 Renamed");
    assert_eq!(company.num_employees, Some(10));
    assert_eq!(company.logo_url, None);
    assert_eq!(company.description, "Desc1");

    let err = Company::update(&tx, "c1", &UpdatePayload::new().with("handle", "c9"))
        .await
        .unwrap_err();
    assert!(err.is_malformed_request());

    let err = Company::update(&tx, "nope", &UpdatePayload::new().with("name", "x"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    tx.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn remove_cascades_to_jobs() -> JoblyResult<()> {
    let Some(mut client) = try_connect("remove_cascades_to_jobs").await else {
        return Ok(());
    };
    let tx = client.transaction().await?;
    let ids = seed(&tx).await?;

    Company::remove(&tx, "c1").await?;
    assert!(Company::get(&tx, "c1").await.unwrap_err().is_not_found());
    assert!(Job::get(&tx, ids[0]).await.unwrap_err().is_not_found());
    assert!(Company::remove(&tx, "c1").await.unwrap_err().is_not_found());

    tx.rollback().await?;
    Ok(())
}
