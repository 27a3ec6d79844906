/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 任务基础：模型 + 损失 + 优化器/调度器 + 学习率 + 序列化器
 *
 * 训练循环（遍历批、求梯度、保存检查点）由外部训练器负责，
 * 任务只提供各步骤的钩子与`configure_optimizers`
 */

use tracing::{debug, warn};

use super::{SerializerSpec, TaskError};
use crate::data::{Batch, DataKey};
use crate::nn::{LrScheduler, Module, Optimizer, OptimizerConfig, SchedulerConfig};
use crate::tensor::Tensor;
use crate::utils::json::to_json_value;

/// 选项表（名称 -> 值），如`{"momentum": 0.9}`
pub type Options = crate::nn::ConfigOptions;

/// 优化器：配置、名称或现成的实例
pub enum OptimizerSpec {
    Config(OptimizerConfig),
    /// 名称（如`"adam"`），配合优化器选项使用
    Name(String),
    /// 现成的实例，学习率以实例为准
    Instance(Box<dyn Optimizer>),
}

impl OptimizerSpec {
    /// 用于超参数记录的描述
    pub fn describe(&self) -> serde_json::Value {
        match self {
            Self::Config(config) => to_json_value(config).unwrap_or(serde_json::Value::Null),
            Self::Name(name) => serde_json::Value::String(name.clone()),
            Self::Instance(_) => serde_json::Value::String("instance".to_string()),
        }
    }
}

impl Default for OptimizerSpec {
    fn default() -> Self {
        Self::Config(OptimizerConfig::default())
    }
}

impl std::fmt::Debug for OptimizerSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OptimizerSpec({})", self.describe())
    }
}

/// 学习率调度器：配置、名称或现成的实例
pub enum SchedulerSpec {
    Config(SchedulerConfig),
    /// 名称（如`"steplr"`），配合调度器选项使用
    Name(String),
    Instance(Box<dyn LrScheduler>),
}

impl SchedulerSpec {
    pub fn describe(&self) -> serde_json::Value {
        match self {
            Self::Config(config) => to_json_value(config).unwrap_or(serde_json::Value::Null),
            Self::Name(name) => serde_json::Value::String(name.clone()),
            Self::Instance(_) => serde_json::Value::String("instance".to_string()),
        }
    }
}

impl std::fmt::Debug for SchedulerSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SchedulerSpec({})", self.describe())
    }
}

/// `configure_optimizers`的结果
pub struct ConfiguredOptimizers {
    pub optimizer: Box<dyn Optimizer>,
    pub scheduler: Option<Box<dyn LrScheduler>>,
}

/// 任务 trait
pub trait Task {
    /// 模型前向
    fn forward(&self, input: &Tensor) -> Result<Tensor, TaskError>;

    /// 训练步骤，返回该批的标量损失
    fn training_step(&mut self, batch: &Batch, batch_idx: usize) -> Result<f32, TaskError>;

    /// 验证步骤，返回该批的标量损失
    fn validation_step(&mut self, batch: &Batch, batch_idx: usize) -> Result<f32, TaskError>;

    /// 测试步骤，返回该批的标量损失
    fn test_step(&mut self, batch: &Batch, batch_idx: usize) -> Result<f32, TaskError>;

    /// 预测步骤：默认对输入做前向
    fn predict_step(&self, batch: &Batch, _batch_idx: usize) -> Result<Tensor, TaskError> {
        let input = batch
            .get(DataKey::Input)
            .ok_or(TaskError::MissingBatchKey(DataKey::Input))?;
        self.forward(input)
    }

    /// 构建优化器与（可选的）学习率调度器
    fn configure_optimizers(&mut self) -> Result<ConfiguredOptimizers, TaskError>;
}

/// 任务的通用部分
pub struct TaskCore {
    model: Box<dyn Module>,
    optimizer: Option<OptimizerSpec>,
    optimizer_options: Options,
    scheduler: Option<SchedulerSpec>,
    scheduler_options: Options,
    learning_rate: f32,
    serializer: Option<SerializerSpec>,
}

impl TaskCore {
    pub fn new(model: Box<dyn Module>, learning_rate: f32) -> Self {
        Self {
            model,
            optimizer: Some(OptimizerSpec::default()),
            optimizer_options: Options::new(),
            scheduler: None,
            scheduler_options: Options::new(),
            learning_rate,
            serializer: None,
        }
    }

    pub fn with_optimizer(mut self, optimizer: OptimizerSpec, options: Options) -> Self {
        self.optimizer = Some(optimizer);
        self.optimizer_options = options;
        self
    }

    pub fn with_scheduler(mut self, scheduler: Option<SchedulerSpec>, options: Options) -> Self {
        self.scheduler = scheduler;
        self.scheduler_options = options;
        self
    }

    pub fn with_serializer(mut self, serializer: Option<SerializerSpec>) -> Self {
        self.serializer = serializer;
        self
    }

    pub fn model(&self) -> &dyn Module {
        self.model.as_ref()
    }

    pub fn model_mut(&mut self) -> &mut dyn Module {
        self.model.as_mut()
    }

    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    pub fn serializer(&self) -> Option<&SerializerSpec> {
        self.serializer.as_ref()
    }

    pub fn forward(&self, input: &Tensor) -> Result<Tensor, TaskError> {
        Ok(self.model.forward(input)?)
    }

    /// 序列化一批预测结果；未设置序列化器时返回`None`
    pub fn serialize(&self, batch: &Batch) -> Result<Option<serde_json::Value>, TaskError> {
        self.serializer
            .as_ref()
            .map(|serializer| serializer.serialize(batch))
            .transpose()
    }

    /// 构建优化器与调度器
    ///
    /// 配置或名称形式可重复构建；实例形式只能取走一次
    pub fn configure_optimizers(&mut self) -> Result<ConfiguredOptimizers, TaskError> {
        let optimizer = match self.optimizer.take() {
            None => return Err(TaskError::OptimizerConsumed),
            Some(OptimizerSpec::Instance(optimizer)) => {
                if !self.optimizer_options.is_empty() {
                    warn!(options = ?self.optimizer_options, "优化器为现成实例，忽略优化器选项");
                }
                optimizer
            }
            Some(OptimizerSpec::Config(config)) => {
                let merged = config.with_options(&self.optimizer_options);
                self.optimizer = Some(OptimizerSpec::Config(config));
                merged?.build(self.learning_rate)
            }
            Some(OptimizerSpec::Name(name)) => {
                let config = OptimizerConfig::from_name(&name, &self.optimizer_options);
                self.optimizer = Some(OptimizerSpec::Name(name));
                config?.build(self.learning_rate)
            }
        };

        // 调度器以优化器实际的学习率为起点
        let base_lr = optimizer.learning_rate();
        let scheduler = match self.scheduler.take() {
            None => None,
            Some(SchedulerSpec::Instance(scheduler)) => {
                if !self.scheduler_options.is_empty() {
                    warn!(options = ?self.scheduler_options, "调度器为现成实例，忽略调度器选项");
                }
                Some(scheduler)
            }
            Some(SchedulerSpec::Config(config)) => {
                let merged = config.with_options(&self.scheduler_options);
                self.scheduler = Some(SchedulerSpec::Config(config));
                Some(merged?.build(base_lr)?)
            }
            Some(SchedulerSpec::Name(name)) => {
                let config = SchedulerConfig::from_name(&name, &self.scheduler_options);
                self.scheduler = Some(SchedulerSpec::Name(name));
                Some(config?.build(base_lr)?)
            }
        };

        debug!(
            learning_rate = base_lr,
            scheduler = scheduler.is_some(),
            "构建优化器"
        );
        Ok(ConfiguredOptimizers {
            optimizer,
            scheduler,
        })
    }
}
