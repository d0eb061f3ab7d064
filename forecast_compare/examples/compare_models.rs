use forecast_compare::{ForecastRequest, ForecastService, ModelKind, ServiceConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Forecast Compare: Model Comparison Example");
    println!("==========================================\n");

    // Three years of monthly sales with a yearly cycle
    let mut csv = String::from("month,sales\n");
    for i in 0..36 {
        let seasonal = 40.0 * (2.0 * std::f64::consts::PI * (i % 12) as f64 / 12.0).sin();
        let value = 1000.0 + 5.0 * i as f64 + seasonal;
        csv.push_str(&format!("{}-{:02}-01,{:.2}\n", 2021 + i / 12, i % 12 + 1, value));
    }

    let service = ForecastService::new(ServiceConfig::with_output_dir("example_output"));
    let report = service.run(&ForecastRequest {
        csv: csv.into_bytes(),
        date_column: "month".to_string(),
        value_column: "sales".to_string(),
        periods: 6,
        model: "holtwinters".to_string(),
    })?;

    println!("Model accuracies:");
    for kind in ModelKind::ALL {
        println!("  {:<22} {}", kind.label(), report.model_accuracies[&kind]);
    }

    println!("\nSelected model: {}", report.selected.id().to_uppercase());
    for record in &report.predictions {
        println!("  {}  {:.2}", record.ds, record.yhat);
    }

    println!("\nComparison chart: {}", report.artifacts.comparison_chart.display());
    println!("Selected chart:   {}", report.artifacts.selected_chart.display());
    println!("Forecast table:   {}", report.artifacts.export.display());

    Ok(())
}
