use chrono::{Duration, NaiveDate};
use fake::faker::lorem::en::Sentence;
use fake::{Fake, Faker};
use finance_repo::expense_repo::{NewExpense, UserId};
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;

pub trait Generator<T> {
    fn gen(&mut self) -> T;
}

pub struct Predefined<T> {
    values: Vec<T>,
    current_pos: usize,
}

impl<T> Predefined<T> {
    pub fn boxed(values: Vec<T>) -> Box<Predefined<T>> {
        Box::new(Predefined {
            values,
            current_pos: 0,
        })
    }
}

impl<T: Clone> Generator<T> for Predefined<T> {
    fn gen(&mut self) -> T {
        let v = self.values[self.current_pos % self.values.len()].clone();
        self.current_pos += 1;
        v
    }
}

pub struct RandomSample<T> {
    values: Vec<T>,
}

impl<T> RandomSample<T> {
    pub fn boxed(values: Vec<T>) -> Box<RandomSample<T>> {
        Box::new(RandomSample { values })
    }
}

impl<T: Clone> Generator<T> for RandomSample<T> {
    fn gen(&mut self) -> T {
        self.values.choose(&mut rand::thread_rng()).unwrap().clone()
    }
}

pub struct FakeGenerator<F: Fake> {
    fake: F,
}

impl<F: Fake> FakeGenerator<F> {
    pub fn boxed(fake: F) -> Box<FakeGenerator<F>> {
        Box::new(FakeGenerator { fake })
    }
}

impl<T: fake::Dummy<F>, F> Generator<T> for FakeGenerator<F> {
    fn gen(&mut self) -> T {
        self.fake.fake()
    }
}

/// Amounts in cents, so they survive a round trip through NUMERIC unchanged.
pub struct FakeAmount;

impl Generator<Decimal> for FakeAmount {
    fn gen(&mut self) -> Decimal {
        Decimal::new(Faker.fake::<u16>() as i64, 2)
    }
}

/// Dates within a few years of 2020, inside the range Postgres can store.
pub struct FakeDate;

impl Generator<NaiveDate> for FakeDate {
    fn gen(&mut self) -> NaiveDate {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        start + Duration::days(rand::thread_rng().gen_range(0..1500))
    }
}

#[allow(dead_code)]
pub struct NewExpenseGenerator {
    user_id: UserId,
    desc_gen: Box<dyn Generator<String>>,
    amnt_gen: Box<dyn Generator<Decimal>>,
    date_gen: Box<dyn Generator<NaiveDate>>,
    cat_gen: Box<dyn Generator<Option<String>>>,
}

#[allow(dead_code)]
impl NewExpenseGenerator {
    pub fn new(user_id: UserId) -> NewExpenseGenerator {
        NewExpenseGenerator {
            user_id,
            desc_gen: FakeGenerator::boxed(Sentence(2..5)),
            amnt_gen: Box::new(FakeAmount),
            date_gen: Box::new(FakeDate),
            cat_gen: RandomSample::boxed(vec![
                None,
                Some("Groceries".to_string()),
                Some("Eating Out".to_string()),
                Some("Transportation".to_string()),
                Some("Utilities".to_string()),
            ]),
        }
    }

    pub fn with_categories(mut self, categories: Vec<Option<&str>>) -> NewExpenseGenerator {
        let categories = categories
            .into_iter()
            .map(|c| c.map(|c| c.to_string()))
            .collect();
        self.cat_gen = Predefined::boxed(categories);
        self
    }

    pub fn with_amounts(mut self, amounts: Vec<Decimal>) -> NewExpenseGenerator {
        self.amnt_gen = Predefined::boxed(amounts);
        self
    }

    pub fn generate(&mut self) -> NewExpense {
        NewExpense::new(
            self.user_id,
            self.desc_gen.gen(),
            self.amnt_gen.gen(),
            self.date_gen.gen(),
            self.cat_gen.gen(),
        )
    }

    pub fn generate_many(&mut self, count: usize) -> Vec<NewExpense> {
        let mut vec = Vec::with_capacity(count);
        for _ in 0..count {
            vec.push(self.generate())
        }
        vec
    }
}
