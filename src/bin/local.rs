use log::{error, info};

use dashboard_engine::{
    chart::{ChartConfig, ChartSlot, VisualType},
    config::{ChartRequestConfig, EngineConfig},
    data_store::LocalDataStore,
    filter::Filter,
    DashboardProcessor,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = EngineConfig::new().map_err(|e| {
        error!("Failed to initialize config: {}", e);
        e
    })?;

    let request = ChartRequestConfig::new().map_err(|e| {
        error!("Failed to initialize chart request config: {}", e);
        e
    })?;

    let data_store = LocalDataStore::from_path(&config.records_path, &config.date_column)
        .await
        .map_err(|e| {
            error!("Failed to load records from {}: {}", config.records_path, e);
            e
        })?;

    let mut chart = ChartSlot::new("local", VisualType::from(request.visual_type.as_str()));
    if let Some(path) = &request.chart_config_path {
        let json = tokio::fs::read_to_string(path).await?;
        let chart_config: ChartConfig = serde_json::from_str(&json).map_err(|e| {
            error!("Invalid chart config in {}: {}", path, e);
            e
        })?;
        chart.set_config(chart_config);
    }

    let filters: Vec<Filter> = match &request.filters_path {
        Some(path) => serde_json::from_str(&tokio::fs::read_to_string(path).await?)?,
        None => vec![],
    };

    let processor = DashboardProcessor::new(data_store.clone(), data_store, &config);
    let mut charts = vec![chart];
    let renders = processor.render_charts(&mut charts, &filters).await?;

    if let Some(config) = &charts[0].config {
        info!("Rendered {} chart with {}", charts[0].visual_type, serde_json::to_string(config)?);
    }
    for render in renders {
        println!("{}", serde_json::to_string_pretty(&render.points)?);
    }

    Ok(())
}
