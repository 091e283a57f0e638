use burn::LearningRate;
use burn::optim::{AdamWConfig, GradientsParams, Optimizer};
use burn::tensor::backend::Backend as BackendTrait;
use burn_autodiff::Autodiff;
use burn_ndarray::NdArray;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tinyformer::{
    AdditionClassifier, AdditionDataset, ArithmeticVocab, DatasetSplit, TextCorpusDataset,
    TrunkConfig, WordLanguageModel, language_model_loss,
};

type Backend = Autodiff<NdArray<f32>>;

fn small_config(vocab_size: usize, block_size: usize) -> TrunkConfig {
    let mut config = TrunkConfig::new(vocab_size, block_size);
    config.n_layer = 1;
    config.n_embd = 32;
    config.n_head = 2;
    config.dropout = 0.0;
    config
}

#[test]
fn single_language_model_step_executes() {
    let text = "all the world is a stage and all the men and women merely players ".repeat(16);
    let block_size = 8;
    let batch_size = 4;
    let dataset =
        TextCorpusDataset::from_text(&text, block_size, batch_size).expect("build dataset");

    let device = <Backend as BackendTrait>::Device::default();
    <Backend as BackendTrait>::seed(123);
    let mut rng = StdRng::seed_from_u64(123);

    let config = small_config(dataset.vocab().len(), block_size);
    let model = WordLanguageModel::<Backend>::new(&config, &device);
    let mut optimizer = AdamWConfig::new()
        .with_weight_decay(0.1)
        .init::<Backend, WordLanguageModel<Backend>>();
    let lr: LearningRate = 1e-3;

    let batch = dataset
        .sample_batch::<Backend>(DatasetSplit::Train, &mut rng, &device)
        .expect("train batch");

    let logits = model.forward(batch.inputs.clone());
    let loss = language_model_loss::<Backend>(logits, batch.targets.clone());
    let loss_scalar = loss
        .clone()
        .to_data()
        .convert::<f32>()
        .into_vec::<f32>()
        .expect("loss to vec")[0];
    assert!(loss_scalar.is_finite());

    let grads = loss.backward();
    let grads = GradientsParams::from_grads(grads, &model);
    let _ = optimizer.step(lr, model, grads);
}

#[test]
fn single_classifier_step_executes() {
    let dataset = AdditionDataset::new(ArithmeticVocab::new(), 2, 4).expect("build dataset");

    let device = <Backend as BackendTrait>::Device::default();
    <Backend as BackendTrait>::seed(321);
    let mut rng = StdRng::seed_from_u64(321);

    let config = small_config(dataset.vocab().len(), dataset.question_length());
    let model =
        AdditionClassifier::<Backend>::new(&config, dataset.answer_classes(), &device);
    let mut optimizer = AdamWConfig::new()
        .with_weight_decay(0.1)
        .init::<Backend, AdditionClassifier<Backend>>();
    let lr: LearningRate = 1e-3;

    let batch = dataset.sample_batch::<Backend>(DatasetSplit::Train, &mut rng, &device);
    let output = model.forward(batch.inputs, Some(batch.targets));
    let loss = output.loss.expect("loss present with targets");
    let loss_scalar = loss
        .clone()
        .to_data()
        .convert::<f32>()
        .into_vec::<f32>()
        .expect("loss to vec")[0];
    assert!(loss_scalar.is_finite());

    let grads = loss.backward();
    let grads = GradientsParams::from_grads(grads, &model);
    let _ = optimizer.step(lr, model, grads);
}
