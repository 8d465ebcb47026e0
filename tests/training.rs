use ltr_nn::eval::ndcg_avg;
use ltr_nn::network::NetworkShape;
use ltr_nn::report::{CsvReport, MemoryReport};
use ltr_nn::{Activation, Algorithm, MlpRanker, Model, Query, Ranker, SortNetRanker, Trainer, TrainerConfig, data};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;

fn random_queries(rng: &mut StdRng) -> Vec<Query> {
    (0..2)
        .map(|q| {
            let docs = [2.0, 1.0, 0.0]
                .into_iter()
                .map(|label| ((0..4).map(|_| rng.random_range(0.0..1.0)).collect(), label))
                .collect();
            Query::from_labeled(format!("q{}", q), docs)
        })
        .collect()
}

#[test]
fn test_sortnet_does_not_lose_ndcg() {
    let dir = tempfile::tempdir().unwrap();
    let mut rng = StdRng::seed_from_u64(2024);
    let queries = random_queries(&mut rng);

    let mut config = TrainerConfig::new(50, 0.5, NetworkShape::default().with_layer(4, Activation::Sigmoid));
    config.batch_size = 1;
    config.ndcg_k = Some(3);
    config.model_file = Some(dir.path().join("sortnet.json"));

    let mut trainer = Trainer::sortnet(config, queries.clone(), queries.clone(), rng, MemoryReport::default()).unwrap();
    let initial = ndcg_avg(trainer.ranker_mut(), &queries, 3).unwrap();

    let summary = trainer.train_and_validate().unwrap();
    let last = summary.records.last().unwrap();

    assert_eq!(summary.records.len(), 50);
    assert!(last.ndcg >= initial, "ndcg went from {} to {}", initial, last.ndcg);
    assert!(summary.max_score >= last.ndcg);
    assert!(summary.records.iter().all(|r| (0.0..=1.0 + 1e-12).contains(&r.ndcg)));
}

#[test]
fn test_saved_sortnet_ranks_like_trained_one() {
    let dir = tempfile::tempdir().unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    let queries = random_queries(&mut rng);

    let mut config = TrainerConfig::new(5, 0.2, NetworkShape::default().with_layer(3, Activation::Tanh));
    config.model_file = Some(dir.path().join("nested").join("model.json"));

    let mut trainer = Trainer::sortnet(config, queries.clone(), queries.clone(), rng, MemoryReport::default()).unwrap();
    let summary = trainer.train_and_validate().unwrap();

    let model = Model::read(&summary.model_file).unwrap();
    assert_eq!(model.algorithm, SortNetRanker::NAME);
    let mut restored = SortNetRanker::from_model(&model).unwrap();

    for query in &queries {
        let expected = trainer.ranker_mut().score_documents(query.documents()).unwrap();
        let actual = restored.score_documents(query.documents()).unwrap();
        assert_eq!(expected, actual);
    }
}

#[test]
fn test_pointwise_from_letor_files() {
    let dir = tempfile::tempdir().unwrap();
    let train_path = dir.path().join("train.txt");
    let mut file = std::fs::File::create(&train_path).unwrap();
    write!(
        file,
        "2 qid:1 1:0.9 2:0.1 # best\n\
         1 qid:1 1:0.5 2:0.5\n\
         0 qid:1 1:0.1 2:0.9\n\
         1 qid:2 1:0.6 2:0.3\n\
         0 qid:2 2:0.8\n"
    )
    .unwrap();
    drop(file);

    let config = TrainerConfig::from_json(&format!(
        r#"{{
            "algorithm": "pointwise",
            "numIterations": 20,
            "batchSize": 2,
            "learningRate": 0.1,
            "regularization": "L2",
            "regularizationRate": 0.001,
            "layers": [{{"num": 3, "activator": "Sigmoid"}}],
            "ndcgK": 3,
            "modelFile": {:?}
        }}"#,
        dir.path().join("mlp.json")
    ))
    .unwrap();
    assert_eq!(config.algorithm, Algorithm::Pointwise);

    let training = data::read_letor_file(&train_path).unwrap();
    assert_eq!(training.len(), 2);
    assert_eq!(training[1].documents()[1].features(), &[0.0, 0.8]);

    let csv_path = dir.path().join("report.csv");
    let report = CsvReport::create(&csv_path).unwrap();
    let mut trainer = Trainer::pointwise(config, training.clone(), training.clone(), StdRng::seed_from_u64(3), report).unwrap();
    let summary = trainer.train_and_validate().unwrap();

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv.lines().count(), 21);
    assert!(csv.starts_with("epoch,ndcg,train_loss,validation_loss\n1,"));

    let mut restored = MlpRanker::from_model(&Model::read(&summary.model_file).unwrap()).unwrap();
    let features = training[0].documents()[0].features();
    assert_eq!(trainer.ranker_mut().predict(features).unwrap(), restored.predict(features).unwrap());
}
