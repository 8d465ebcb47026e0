//! Epoch loop shared by every training algorithm
//!
//! One epoch is a call to the algorithm's `train` followed by a validation
//! pass that scores NDCG@k on the validation set and the loss on both sets.
//! After the last epoch the report is closed and the model is written.

use crate::algorithm::{Pointwise, SortNet, TrainingAlgorithm};
use crate::config::{Algorithm, TrainerConfig};
use crate::data::{Document, Query, check_feature_len};
use crate::error::{LtrError, Result};
use crate::eval::{ndcg_avg, sort_p};
use crate::loss::ErrorFunctionKind;
use crate::ranker::{MlpRanker, Ranker, SortNetRanker};
use crate::report::{EpochRecord, Report};
use rand::Rng;
use std::path::PathBuf;

/// Outcome of a completed run
#[derive(Clone, Debug, PartialEq)]
pub struct TrainingSummary {
    /// Best validation NDCG seen
    pub max_score: f64,
    pub records: Vec<EpochRecord>,
    pub model_file: PathBuf,
}

/// Drives a ranker through the epochs of one run
pub struct Trainer<R, A, S> {
    ranker: R,
    algorithm: A,
    report: S,
    config: TrainerConfig,
    training: Vec<Query>,
    validation: Vec<Query>,
    max_score: f64,
    records: Vec<EpochRecord>,
}

/// Reject a configuration written for another algorithm
fn check_algorithm(config: &TrainerConfig, expected: Algorithm) -> Result<()> {
    if config.algorithm != expected {
        return Err(LtrError::Config(format!(
            "configuration is for {:?}, cannot build a {:?} trainer", config.algorithm, expected
        )));
    }
    Ok(())
}

/// Feature length of the first training document
fn first_feature_len(training: &[Query]) -> Result<usize> {
    match training.first().map(Query::feature_len) {
        None => Err(LtrError::Config("training set is empty".to_string())),
        Some(0) => Err(LtrError::Config("first training query has no features".to_string())),
        Some(len) => Ok(len),
    }
}

impl<R: Ranker, A: TrainingAlgorithm<R>, S: Report> Trainer<R, A, S> {
    pub fn new(
        ranker: R,
        algorithm: A,
        config: TrainerConfig,
        training: Vec<Query>,
        validation: Vec<Query>,
        report: S,
    ) -> Result<Self> {
        config.validate()?;
        check_feature_len(&training, ranker.feature_len())?;
        check_feature_len(&validation, ranker.feature_len())?;

        Ok(Trainer {
            ranker,
            algorithm,
            report,
            config,
            training,
            validation,
            max_score: 0.0,
            records: Vec::new(),
        })
    }

    pub fn ranker(&self) -> &R {
        &self.ranker
    }

    pub fn ranker_mut(&mut self) -> &mut R {
        &mut self.ranker
    }

    pub fn into_ranker(self) -> R {
        self.ranker
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn report(&self) -> &S {
        &self.report
    }

    /// Best validation NDCG so far
    pub fn max_score(&self) -> f64 {
        self.max_score
    }

    pub fn records(&self) -> &[EpochRecord] {
        &self.records
    }

    /// Run one epoch of the algorithm
    pub fn train(&mut self) -> Result<()> {
        self.algorithm.train(&mut self.ranker, &self.training, &self.config)
    }

    /// Training and validation loss
    pub fn calculate_loss(&mut self) -> Result<(f64, f64)> {
        let train = self.algorithm.loss(&mut self.ranker, &self.training)?;
        let validation = self.algorithm.loss(&mut self.ranker, &self.validation)?;
        Ok((train, validation))
    }

    /// Score the validation set and report the epoch
    pub fn validate(&mut self, epoch: usize, k: usize) -> Result<EpochRecord> {
        let ndcg = ndcg_avg(&mut self.ranker, &self.validation, k)?;
        if ndcg > self.max_score {
            self.max_score = ndcg;
        }
        let (train_loss, validation_loss) = self.calculate_loss()?;

        let record = EpochRecord { epoch, ndcg, train_loss, validation_loss };
        self.report.log(record)?;
        self.records.push(record);
        Ok(record)
    }

    /// Documents of `query` in the order the current ranker puts them
    pub fn sort_p<'q>(&mut self, query: &'q Query) -> Result<Vec<&'q Document>> {
        sort_p(&mut self.ranker, query)
    }

    /// Run every configured epoch, close the report and write the model
    pub fn train_and_validate(&mut self) -> Result<TrainingSummary> {
        let epochs = self.config.num_iterations;
        let k = self.config.ndcg_k();
        log::info!(
            "training {} on {} queries for {} epochs (ndcg@{})",
            self.ranker.name(), self.training.len(), epochs, k
        );

        for epoch in 1..=epochs {
            self.train()?;
            self.validate(epoch, k)?;
        }
        self.report.close()?;

        let model_file = self.config.model_file();
        self.ranker.to_model().write(&model_file).inspect_err(|e| {
            log::error!("cannot write model to {}: {}", model_file.display(), e);
        })?;
        log::info!("best ndcg@{} = {:.6}, model saved to {}", k, self.max_score, model_file.display());

        Ok(TrainingSummary {
            max_score: self.max_score,
            records: self.records.clone(),
            model_file,
        })
    }
}

impl<G: Rng, S: Report> Trainer<SortNetRanker, SortNet<G>, S> {
    /// SortNet run sized from the first training query. `rng` initialises
    /// the weights and then drives pair sampling.
    pub fn sortnet(
        config: TrainerConfig,
        training: Vec<Query>,
        validation: Vec<Query>,
        mut rng: G,
        report: S,
    ) -> Result<Self> {
        config.validate()?;
        check_algorithm(&config, Algorithm::SortNet)?;
        let ranker = SortNetRanker::with_rng(
            first_feature_len(&training)?,
            &config.layers,
            config.optimizer,
            config.regularization,
            config.weight_init,
            &mut rng,
        );
        Trainer::new(ranker, SortNet::with_rng(rng), config, training, validation, report)
    }
}

impl<S: Report> Trainer<MlpRanker, Pointwise<ErrorFunctionKind>, S> {
    /// Pointwise run sized from the first training query, fitting with the
    /// configured error function
    pub fn pointwise<G: Rng>(
        config: TrainerConfig,
        training: Vec<Query>,
        validation: Vec<Query>,
        mut rng: G,
        report: S,
    ) -> Result<Self> {
        config.validate()?;
        check_algorithm(&config, Algorithm::Pointwise)?;
        let ranker = MlpRanker::with_output(
            first_feature_len(&training)?,
            &config.layers,
            config.error_function.output_activation(),
            config.optimizer,
            config.regularization,
            config.weight_init,
            &mut rng,
        );
        let algorithm = Pointwise::new(config.error_function);
        Trainer::new(ranker, algorithm, config, training, validation, report)
    }
}
